//! Sow action - plants seeds from the holder's container on plowed fields.

use bevy_ecs::prelude::*;

use super::FieldAction;
use crate::components::{Field, SeedContainer};
use crate::error::{FarmError, Result};
use crate::species::SpeciesRegistry;
use crate::systems::crops;

/// Sows the species held in the [`SeedContainer`] of `holder`.
///
/// One seed is charged per swept cell, whether or not a crop was planted
/// there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sow {
    pub holder: Entity,
}

impl Sow {
    pub fn new(holder: Entity) -> Self {
        Self { holder }
    }

    fn container<'w>(&self, world: &'w World) -> Option<&'w SeedContainer> {
        world.get::<SeedContainer>(self.holder)
    }
}

impl FieldAction for Sow {
    fn can_continue(&self, world: &World) -> bool {
        self.container(world)
            .is_some_and(|container| container.seeds.remaining > 0)
    }

    fn do_field_action(&mut self, world: &mut World, field: Entity) -> Result<()> {
        // The container may run dry while a cell's occupants are processed.
        if !self.can_continue(world) || !self.can_execute_on(world, field) {
            return Ok(());
        }
        let Some(species_id) = self.container(world).map(|c| c.species_id.clone()) else {
            return Ok(());
        };
        crops::plant(world, field, &species_id)?;
        Ok(())
    }

    fn on_cell_processed(&mut self, world: &mut World, _dy: i32, _dx: i32) {
        if let Some(mut container) = world.get_mut::<SeedContainer>(self.holder) {
            container.seeds.consume_one();
        }
    }

    fn can_execute_on(&self, world: &World, entity: Entity) -> bool {
        world
            .get::<Field>(entity)
            .is_some_and(Field::can_receive_crop)
    }

    fn validate(&self, world: &World) -> Result<()> {
        let container = self
            .container(world)
            .ok_or(FarmError::UnboundContainer("seed", self.holder))?;
        let known = world
            .get_resource::<SpeciesRegistry>()
            .is_some_and(|registry| registry.contains(&container.species_id));
        if !known {
            return Err(FarmError::UnknownSpecies(container.species_id.clone()));
        }
        Ok(())
    }
}
