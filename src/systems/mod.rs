//! ECS Systems and world operations for the farm simulation.
//!
//! **Per-frame refresh** (no state transitions):
//! - `field_grid_update_system` - Rebuilds the occupancy grid
//! - `field_appearance_system` - Field display from plowed/watered state
//! - `crop_appearance_system` - Crop display from its current stage
//!
//! **Daily tick**:
//! - `advance_day` - Folds field exposure into crops and runs stage transitions
//!
//! **On demand**:
//! - `plant`, `harvest`, `add_sun`, `add_water`, `setup_field`

pub mod crops;
pub mod fields;
pub mod serialization;

pub use crops::*;
pub use fields::*;
pub use serialization::*;
