//! Field action engine.
//!
//! An [`AreaAction`] applies one of the field actions (plow, water, sow) to
//! every field in a reach rectangle around an origin entity:
//!
//! 1. The rectangle is turned into an ordered cell sequence with
//!    [`sweep`] (or just the origin cell for a 1x1 rectangle).
//! 2. Each offset is rotated to the actor's facing and resolved to
//!    occupants through a [`GridQuery`].
//! 3. Every occupant with a [`Field`] receives the action.
//! 4. After each cell the action may consume a resource unit and is asked
//!    whether it can continue. A cell counts once however many occupants it
//!    has.
//! 5. Post-execution commands run once the sweep is over, with the grid
//!    resource back in place.

pub mod commands;
pub mod plow;
pub mod sow;
pub mod water;

pub use commands::{CommandFn, CommandRegistry};
pub use plow::Plow;
pub use sow::Sow;
pub use water::Water;

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::{Field, GridPosition};
use crate::error::{FarmError, Result};
use crate::geometry::{rotate_offset, sweep, CellOffset, Direction, Rect};
use crate::spatial::{FieldGrid, GridQuery};

/// Behavior shared by all field actions.
pub trait FieldAction {
    /// Whether the sweep may go on to the next cell.
    fn can_continue(&self, world: &World) -> bool;

    /// Apply the action to one field entity.
    fn do_field_action(&mut self, world: &mut World, field: Entity) -> Result<()>;

    /// Called once per swept cell, after its occupants were processed.
    fn on_cell_processed(&mut self, _world: &mut World, _dy: i32, _dx: i32) {}

    /// Whether `entity` is a useful target, for highlighting selections.
    fn can_execute_on(&self, world: &World, entity: Entity) -> bool;

    /// Preconditions checked before any cell is touched.
    fn validate(&self, _world: &World) -> Result<()> {
        Ok(())
    }
}

/// The closed set of field actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldActionKind {
    Plow(Plow),
    Water(Water),
    Sow(Sow),
}

impl FieldActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldActionKind::Plow(_) => "plow",
            FieldActionKind::Water(_) => "water",
            FieldActionKind::Sow(_) => "sow",
        }
    }
}

impl FieldAction for FieldActionKind {
    fn can_continue(&self, world: &World) -> bool {
        match self {
            FieldActionKind::Plow(a) => a.can_continue(world),
            FieldActionKind::Water(a) => a.can_continue(world),
            FieldActionKind::Sow(a) => a.can_continue(world),
        }
    }

    fn do_field_action(&mut self, world: &mut World, field: Entity) -> Result<()> {
        match self {
            FieldActionKind::Plow(a) => a.do_field_action(world, field),
            FieldActionKind::Water(a) => a.do_field_action(world, field),
            FieldActionKind::Sow(a) => a.do_field_action(world, field),
        }
    }

    fn on_cell_processed(&mut self, world: &mut World, dy: i32, dx: i32) {
        match self {
            FieldActionKind::Plow(a) => a.on_cell_processed(world, dy, dx),
            FieldActionKind::Water(a) => a.on_cell_processed(world, dy, dx),
            FieldActionKind::Sow(a) => a.on_cell_processed(world, dy, dx),
        }
    }

    fn can_execute_on(&self, world: &World, entity: Entity) -> bool {
        match self {
            FieldActionKind::Plow(a) => a.can_execute_on(world, entity),
            FieldActionKind::Water(a) => a.can_execute_on(world, entity),
            FieldActionKind::Sow(a) => a.can_execute_on(world, entity),
        }
    }

    fn validate(&self, world: &World) -> Result<()> {
        match self {
            FieldActionKind::Plow(a) => a.validate(world),
            FieldActionKind::Water(a) => a.validate(world),
            FieldActionKind::Sow(a) => a.validate(world),
        }
    }
}

impl From<Plow> for FieldActionKind {
    fn from(action: Plow) -> Self {
        FieldActionKind::Plow(action)
    }
}

impl From<Water> for FieldActionKind {
    fn from(action: Water) -> Self {
        FieldActionKind::Water(action)
    }
}

impl From<Sow> for FieldActionKind {
    fn from(action: Sow) -> Self {
        FieldActionKind::Sow(action)
    }
}

/// Result of executing an [`AreaAction`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Cells visited before the sweep ended.
    pub cells_visited: usize,
    /// Field occupants the action was applied to.
    pub fields_touched: usize,
    /// The sweep stopped early because the action could not continue.
    pub exhausted: bool,
    /// Post-execution command failures. Cell effects are kept.
    pub command_errors: Vec<FarmError>,
}

impl ActionOutcome {
    /// Turn the first command failure into an error.
    pub fn into_result(mut self) -> Result<Self> {
        if self.command_errors.is_empty() {
            Ok(self)
        } else {
            Err(self.command_errors.remove(0))
        }
    }
}

/// A field action aimed at a rectangle around an origin entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaAction {
    pub origin: Entity,
    /// Reach rectangle, north-relative, `(0, 0)` being the origin's cell.
    pub rect: Rect,
    pub direction: Direction,
    /// Command names to run after the sweep.
    pub commands: Vec<String>,
    pub action: FieldActionKind,
}

impl AreaAction {
    pub fn new(
        origin: Entity,
        rect: Rect,
        direction: Direction,
        action: impl Into<FieldActionKind>,
    ) -> Self {
        Self {
            origin,
            rect,
            direction,
            commands: Vec::new(),
            action: action.into(),
        }
    }

    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Offsets visited by this action, in order.
    pub fn targets(&self) -> Vec<CellOffset> {
        if self.rect.is_single_cell() {
            vec![(0, 0)]
        } else {
            sweep(self.rect, false)
        }
    }

    /// Execute against the world's [`FieldGrid`].
    pub fn execute(&mut self, world: &mut World) -> Result<ActionOutcome> {
        let grid = world.remove_resource::<FieldGrid>().unwrap_or_default();
        let result = self.sweep_with(world, &grid);
        world.insert_resource(grid);
        self.finish(world, result?)
    }

    /// Execute using an explicit occupancy lookup.
    pub fn execute_with<G: GridQuery + ?Sized>(
        &mut self,
        world: &mut World,
        grid: &G,
    ) -> Result<ActionOutcome> {
        let outcome = self.sweep_with(world, grid)?;
        self.finish(world, outcome)
    }

    fn finish(&self, world: &mut World, mut outcome: ActionOutcome) -> Result<ActionOutcome> {
        outcome.command_errors = commands::run_commands(world, &self.commands);
        Ok(outcome)
    }

    /// Apply the action cell by cell, without running commands.
    fn sweep_with<G: GridQuery + ?Sized>(
        &mut self,
        world: &mut World,
        grid: &G,
    ) -> Result<ActionOutcome> {
        let origin_pos = world
            .get::<GridPosition>(self.origin)
            .copied()
            .ok_or(FarmError::MissingGridPosition(self.origin))?;
        self.action.validate(world)?;

        let mut outcome = ActionOutcome::default();
        for (dy, dx) in self.targets() {
            let (rdy, rdx) = rotate_offset(dy, dx, self.direction);
            for occupant in grid.lookup(origin_pos, rdy, rdx) {
                if world.get::<Field>(occupant).is_some() {
                    self.action.do_field_action(world, occupant)?;
                    outcome.fields_touched += 1;
                }
            }
            self.action.on_cell_processed(world, dy, dx);
            outcome.cells_visited += 1;

            if !self.action.can_continue(world) {
                outcome.exhausted = true;
                break;
            }
        }

        debug!(
            action = self.action.name(),
            cells = outcome.cells_visited,
            fields = outcome.fields_touched,
            exhausted = outcome.exhausted,
            "field action executed"
        );
        Ok(outcome)
    }
}

/// How much of a selection holds eligible targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    None,
    Partial,
    Full,
}

/// Eligible target cells of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetHighlight {
    /// North-relative offsets holding an eligible field, row-major.
    pub cells: Vec<CellOffset>,
    pub coverage: Coverage,
}

/// Work out which cells of `rect` an action could affect.
///
/// Every cell of the rectangle counts, the origin's included. Only the first
/// occupant of each cell is considered.
pub fn highlight_targets<G: GridQuery + ?Sized>(
    world: &World,
    grid: &G,
    origin: GridPosition,
    rect: Rect,
    direction: Direction,
    action: &FieldActionKind,
) -> TargetHighlight {
    let cells: Vec<CellOffset> = rect
        .cells()
        .filter(|&(dy, dx)| {
            let (rdy, rdx) = rotate_offset(dy, dx, direction);
            grid.lookup(origin, rdy, rdx)
                .first()
                .is_some_and(|&entity| action.can_execute_on(world, entity))
        })
        .collect();

    let coverage = if cells.is_empty() {
        Coverage::None
    } else if cells.len() < rect.cell_count() {
        Coverage::Partial
    } else {
        Coverage::Full
    };
    TargetHighlight { cells, coverage }
}
