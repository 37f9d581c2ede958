//! Water action - pours one unit of water on each field in reach until the
//! holder's container is empty.

use bevy_ecs::prelude::*;

use super::FieldAction;
use crate::components::{Field, WaterContainer};
use crate::error::{FarmError, Result};

/// Waters fields from the [`WaterContainer`] of `holder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Water {
    pub holder: Entity,
}

impl Water {
    pub fn new(holder: Entity) -> Self {
        Self { holder }
    }

    fn remaining(&self, world: &World) -> u32 {
        world
            .get::<WaterContainer>(self.holder)
            .map_or(0, |container| container.0.remaining)
    }
}

impl FieldAction for Water {
    fn can_continue(&self, world: &World) -> bool {
        self.remaining(world) != 0
    }

    fn do_field_action(&mut self, world: &mut World, field: Entity) -> Result<()> {
        if !self.can_continue(world) {
            return Ok(());
        }
        if let Some(mut field) = world.get_mut::<Field>(field) {
            field.add_water(1);
        }
        Ok(())
    }

    fn on_cell_processed(&mut self, world: &mut World, _dy: i32, _dx: i32) {
        if let Some(mut container) = world.get_mut::<WaterContainer>(self.holder) {
            container.0.consume_one();
        }
    }

    fn can_execute_on(&self, world: &World, entity: Entity) -> bool {
        world.get::<Field>(entity).is_some()
    }

    fn validate(&self, world: &World) -> Result<()> {
        if world.get::<WaterContainer>(self.holder).is_none() {
            return Err(FarmError::UnboundContainer("water", self.holder));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_container_does_not_water() {
        let mut world = World::new();
        let holder = world.spawn(WaterContainer::full(0)).id();
        let field = world.spawn(Field::default()).id();
        let mut water = Water::new(holder);

        assert!(!water.can_continue(&world));
        water.do_field_action(&mut world, field).unwrap();
        water.on_cell_processed(&mut world, 0, 0);

        assert_eq!(world.get::<Field>(field).unwrap().water, 0);
        assert_eq!(world.get::<WaterContainer>(holder).unwrap().0.remaining, 0);
    }

    #[test]
    fn test_waters_any_field() {
        let mut world = World::new();
        let holder = world.spawn(WaterContainer::full(3)).id();
        let field = world.spawn(Field::default()).id();
        let mut water = Water::new(holder);

        assert!(water.can_execute_on(&world, field));
        water.do_field_action(&mut world, field).unwrap();
        water.on_cell_processed(&mut world, 0, 0);

        assert_eq!(world.get::<Field>(field).unwrap().water, 1);
        assert_eq!(world.get::<WaterContainer>(holder).unwrap().0.remaining, 2);
        assert!(!water.can_execute_on(&world, holder));
    }
}
