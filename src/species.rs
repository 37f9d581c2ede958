//! Crop species and their growth stage tables.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FarmError, Result};

/// One phase of a crop's life cycle.
///
/// The crop leaves this stage once it has spent `min_days` days in it and
/// collected at least `water` and `sun` units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStage {
    pub min_days: u32,
    pub water: u32,
    pub sun: u32,
    pub gfx: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl GrowthStage {
    pub fn new(min_days: u32, water: u32, sun: u32, gfx: impl Into<String>) -> Self {
        Self {
            min_days,
            water,
            sun,
            gfx: gfx.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Whether accumulated progress satisfies this stage's thresholds.
    pub fn is_complete(&self, days: u32, water: u32, sun: u32) -> bool {
        days >= self.min_days && water >= self.water && sun >= self.sun
    }
}

/// Stage table of one crop species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub stages: Vec<GrowthStage>,
    /// Stage at which the crop becomes ripe.
    pub ripe: usize,
    /// Stage shown after harvest when the crop does not regrow.
    pub harvested: usize,
    /// Stage a harvested crop returns to, if the species produces again.
    #[serde(default)]
    pub regrows: Option<usize>,
}

impl Species {
    /// Look up a stage, reporting out-of-range indices as table errors.
    pub fn stage(&self, species_id: &str, index: usize) -> Result<&GrowthStage> {
        self.stages
            .get(index)
            .ok_or_else(|| FarmError::InvalidStageIndex {
                species: species_id.to_string(),
                index,
                len: self.stages.len(),
            })
    }

    pub fn last_stage(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// Check that the distinguished stage indices point into the table.
    pub fn validate(&self, species_id: &str) -> Result<()> {
        if self.stages.is_empty() {
            return Err(FarmError::InvalidSpecies {
                species: species_id.to_string(),
                reason: "stage table is empty".to_string(),
            });
        }
        self.stage(species_id, self.ripe)?;
        self.stage(species_id, self.harvested)?;
        if let Some(regrows) = self.regrows {
            self.stage(species_id, regrows)?;
            // A crop regrowing at or past ripe could never ripen again.
            if regrows >= self.ripe {
                return Err(FarmError::InvalidSpecies {
                    species: species_id.to_string(),
                    reason: format!("regrows at stage {regrows}, not before ripe stage {}", self.ripe),
                });
            }
        }
        Ok(())
    }
}

/// The tomato: five stages, ripe at 3, regrows from stage 2 after harvest.
pub fn tomato() -> Species {
    let stage = |min_days, water, sun, gfx: &str| {
        GrowthStage::new(min_days, water, sun, gfx).with_namespace("LPC")
    };
    Species {
        stages: vec![
            stage(3, 4, 4, "tomato_1"),
            stage(2, 4, 5, "tomato_2"),
            stage(2, 3, 6, "tomato_3"),
            stage(2, 0, 0, "tomato_4"),
            stage(2, 0, 0, "tomato_5"),
        ],
        ripe: 3,
        harvested: 4,
        regrows: Some(2),
    }
}

/// All known species by identifier.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesRegistry {
    species: BTreeMap<String, Species>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in species.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.species.insert("tomato".to_string(), tomato());
        registry
    }

    /// Parse a JSON object of `species_id -> Species`.
    pub fn from_json(data: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(data)?;
        for (id, species) in &registry.species {
            species.validate(id)?;
        }
        Ok(registry)
    }

    /// Register a species. An already registered identifier is kept as is;
    /// returns whether the species was added.
    pub fn add_species(&mut self, id: impl Into<String>, species: Species) -> Result<bool> {
        let id = id.into();
        species.validate(&id)?;
        if self.species.contains_key(&id) {
            return Ok(false);
        }
        self.species.insert(id, species);
        Ok(true)
    }

    /// Add every species from `other` that is not registered yet.
    pub fn merge(&mut self, other: SpeciesRegistry) -> Result<()> {
        for (id, species) in other.species {
            self.add_species(id, species)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Species> {
        self.species
            .get(id)
            .ok_or_else(|| FarmError::UnknownSpecies(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.species.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }
}
