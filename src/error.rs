//! Error types for field actions, crop growth and configuration.

use bevy_ecs::entity::Entity;
use thiserror::Error;

/// Errors surfaced by the farm simulation core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FarmError {
    #[error("origin entity {0:?} has no grid position")]
    MissingGridPosition(Entity),

    #[error("action requires a bound {0} container on entity {1:?}")]
    UnboundContainer(&'static str, Entity),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("entity {0:?} is not a field")]
    NotAField(Entity),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    #[error("stage index {index} out of range for species {species} ({len} stages)")]
    InvalidStageIndex {
        species: String,
        index: usize,
        len: usize,
    },

    #[error("invalid species {species}: {reason}")]
    InvalidSpecies { species: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FarmError {
    fn from(err: serde_json::Error) -> Self {
        FarmError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FarmError>;
