//! Furrow - Farm Simulation Core
//!
//! A grid-based field action targeting engine and a discrete crop-growth
//! simulation. Uses `bevy_ecs` for the entity-component-system architecture.
//!
//! Tools sweep a reach rectangle around their holder, rotated to its facing,
//! and plow, water or sow every field they find. Planted crops advance
//! through species stage tables once per day from the water and sun their
//! field collected.

pub mod actions;
pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod reach;
pub mod spatial;
pub mod species;
pub mod store;
pub mod systems;
pub mod world;

pub use actions::{
    highlight_targets, ActionOutcome, AreaAction, CommandRegistry, Coverage, FieldAction,
    FieldActionKind, Plow, Sow, TargetHighlight, Water,
};
pub use api::FarmWorld;
pub use components::*;
pub use config::FarmConfig;
pub use error::{FarmError, Result};
pub use geometry::{rotate_offset, rotate_rect, sweep, CellOffset, Direction, Rect};
pub use spatial::{FieldGrid, GridQuery};
pub use species::{GrowthStage, Species, SpeciesRegistry};
pub use store::{EntityRegistry, WorldStore};
pub use systems::*;
pub use world::Snapshot;
