//! Cell occupancy lookup for the farm grid.
//!
//! Provides O(1) lookup of the entities standing on a cell, which is all the
//! field action engine needs to resolve its targets.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use crate::components::GridPosition;

/// Occupancy lookup consumed by the field action engine.
pub trait GridQuery {
    /// Entities on the cell at `(dy, dx)` from `origin`. Empty for unoccupied
    /// or out-of-bounds cells.
    fn lookup(&self, origin: GridPosition, dy: i32, dx: i32) -> Vec<Entity>;
}

/// Grid of occupied cells.
///
/// Tracks which entities are in each cell, in insertion order, plus the
/// reverse mapping so entities can be moved or removed.
#[derive(Resource, Debug, Default)]
pub struct FieldGrid {
    cells: HashMap<GridPosition, Vec<Entity>>,
    entity_cells: HashMap<Entity, GridPosition>,
}

impl FieldGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all entries (call before rebuilding).
    pub fn clear(&mut self) {
        self.cells.clear();
        self.entity_cells.clear();
    }

    /// Insert an entity at a cell, moving it if it was elsewhere.
    pub fn insert(&mut self, entity: Entity, cell: GridPosition) {
        if let Some(&old_cell) = self.entity_cells.get(&entity) {
            if old_cell == cell {
                return;
            }
            if let Some(entries) = self.cells.get_mut(&old_cell) {
                entries.retain(|e| *e != entity);
            }
        }

        self.cells.entry(cell).or_default().push(entity);
        self.entity_cells.insert(entity, cell);
    }

    /// Remove an entity from the grid.
    pub fn remove(&mut self, entity: Entity) {
        if let Some(cell) = self.entity_cells.remove(&entity) {
            if let Some(entries) = self.cells.get_mut(&cell) {
                entries.retain(|e| *e != entity);
            }
        }
    }

    /// Entities on a cell.
    pub fn at(&self, cell: GridPosition) -> &[Entity] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell_count(&self, cell: GridPosition) -> usize {
        self.at(cell).len()
    }

    pub fn total_count(&self) -> usize {
        self.entity_cells.len()
    }
}

impl GridQuery for FieldGrid {
    fn lookup(&self, origin: GridPosition, dy: i32, dx: i32) -> Vec<Entity> {
        self.at(origin.offset(dy, dx)).to_vec()
    }
}

/// System that rebuilds the field grid from entity positions.
pub fn field_grid_update_system(
    mut grid: ResMut<FieldGrid>,
    query: Query<(Entity, &GridPosition)>,
) {
    grid.clear();

    let mut entries: Vec<_> = query.iter().map(|(e, pos)| (e, *pos)).collect();
    // Keep per-cell order stable across rebuilds.
    entries.sort_by_key(|(e, _)| *e);
    for (entity, pos) in entries {
        grid.insert(entity, pos);
    }
}
