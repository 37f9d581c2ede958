//! Plow action - turns the soil of every field in reach.

use bevy_ecs::prelude::*;

use super::FieldAction;
use crate::components::Field;
use crate::error::Result;

/// Marks fields as plowed. Never runs out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plow;

impl FieldAction for Plow {
    fn can_continue(&self, _world: &World) -> bool {
        true
    }

    fn do_field_action(&mut self, world: &mut World, field: Entity) -> Result<()> {
        if let Some(mut field) = world.get_mut::<Field>(field) {
            field.plowed = true;
        }
        Ok(())
    }

    /// Already plowed fields are not worth highlighting.
    fn can_execute_on(&self, world: &World, entity: Entity) -> bool {
        world.get::<Field>(entity).is_some_and(|field| !field.plowed)
    }
}
