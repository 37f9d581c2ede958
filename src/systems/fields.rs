//! Field ledger - layout setup, daily exposure and field appearance.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::*;
use crate::error::{FarmError, Result};
use crate::store::WorldStore;

pub const SOIL_GFX: &str = "soil:01";
pub const SOIL_WATERED_GFX: &str = "soil_watered";
pub const PLOWED_GFX: &str = "plowed_soil";
pub const PLOWED_WATERED_GFX: &str = "plowed_soil_watered";

/// Rectangular block of field cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: String,
    /// First row of the block.
    pub vert_start: i32,
    pub vert_size: u32,
    /// First column of the block.
    pub horz_start: i32,
    pub horz_size: u32,
}

impl FieldLayout {
    /// Identifier of the field at `row`/`col` within this layout.
    pub fn field_identifier(&self, row: u32, col: u32) -> String {
        format!("{}_{}_{}", self.name, row, col)
    }

    pub fn cell_position(&self, row: u32, col: u32) -> GridPosition {
        GridPosition::new(self.horz_start + col as i32, self.vert_start + row as i32)
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            name: "field_1".to_string(),
            vert_start: -10,
            vert_size: 15,
            horz_start: -8,
            horz_size: 15,
        }
    }
}

/// Create the field entities of a layout. A layout whose first cell already
/// exists is left alone. Returns the number of fields created.
pub fn setup_field(world: &mut World, layout: &FieldLayout) -> usize {
    if world.is_identifier_used(&layout.field_identifier(0, 0)) {
        return 0;
    }

    let mut created = 0;
    for row in 0..layout.vert_size {
        for col in 0..layout.horz_size {
            let identifier = layout.field_identifier(row, col);
            if world.is_identifier_used(&identifier) {
                continue;
            }
            let pos = layout.cell_position(row, col);
            world.get_or_create_entity(&identifier, FieldBundle::new(pos.x, pos.y));
            created += 1;
        }
    }

    debug!(layout = %layout.name, created, "field layout set up");
    created
}

fn field_mut<'w>(world: &'w mut World, field_entity: Entity) -> Result<Mut<'w, Field>> {
    world
        .get_mut::<Field>(field_entity)
        .ok_or(FarmError::NotAField(field_entity))
}

/// Add sunlight to a field's daily accumulator.
pub fn add_sun(world: &mut World, field_entity: Entity, amount: u32) -> Result<()> {
    field_mut(world, field_entity)?.add_sun(amount);
    Ok(())
}

/// Add water to a field's daily accumulator.
pub fn add_water(world: &mut World, field_entity: Entity, amount: u32) -> Result<()> {
    field_mut(world, field_entity)?.add_water(amount);
    Ok(())
}

/// Display identifier for a field's state.
pub fn field_gfx(field: &Field) -> &'static str {
    match (field.plowed, field.is_watered()) {
        (true, true) => PLOWED_WATERED_GFX,
        (true, false) => PLOWED_GFX,
        (false, true) => SOIL_WATERED_GFX,
        (false, false) => SOIL_GFX,
    }
}

/// System that keeps field appearance in sync with plowed/watered state.
pub fn field_appearance_system(mut query: Query<(&Field, &mut Appearance), Without<Crop>>) {
    for (field, mut appearance) in query.iter_mut() {
        let gfx = field_gfx(field);
        if appearance.gfx != gfx {
            appearance.gfx = gfx.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_layout() -> FieldLayout {
        FieldLayout {
            name: "plot".to_string(),
            vert_start: 2,
            vert_size: 2,
            horz_start: -1,
            horz_size: 3,
        }
    }

    #[test]
    fn test_setup_field_creates_positional_fields() {
        let mut world = World::new();
        let layout = small_layout();

        assert_eq!(setup_field(&mut world, &layout), 6);

        let entity = world.find_entity("plot_1_2").unwrap();
        assert_eq!(*world.get::<GridPosition>(entity).unwrap(), GridPosition::new(1, 3));
        assert_eq!(*world.get::<Field>(entity).unwrap(), Field::default());
        assert_eq!(world.all_entities_with::<Field>().len(), 6);
    }

    #[test]
    fn test_setup_field_is_idempotent() {
        let mut world = World::new();
        let layout = small_layout();
        setup_field(&mut world, &layout);
        assert_eq!(setup_field(&mut world, &layout), 0);
        assert_eq!(world.all_entities_with::<Field>().len(), 6);
    }

    #[test]
    fn test_add_sun_and_water() {
        let mut world = World::new();
        let field = world.spawn(Field::default()).id();
        add_sun(&mut world, field, 2).unwrap();
        add_water(&mut world, field, 1).unwrap();
        assert_eq!(world.get::<Field>(field).unwrap().sun, 2);
        assert_eq!(world.get::<Field>(field).unwrap().water, 1);

        let not_field = world.spawn(GridPosition::default()).id();
        assert_eq!(add_sun(&mut world, not_field, 1), Err(FarmError::NotAField(not_field)));
    }

    #[test]
    fn test_field_appearance() {
        let mut world = World::new();
        let dry = world.spawn((Field::plowed(), Appearance::new(SOIL_GFX))).id();
        let mut wet_field = Field::default();
        wet_field.add_water(1);
        let wet = world.spawn((wet_field, Appearance::new(SOIL_GFX))).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(field_appearance_system);
        schedule.run(&mut world);

        assert_eq!(world.get::<Appearance>(dry).unwrap().gfx, PLOWED_GFX);
        assert_eq!(world.get::<Appearance>(wet).unwrap().gfx, SOIL_WATERED_GFX);
    }
}
