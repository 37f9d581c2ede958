//! Farm configuration.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::species::SpeciesRegistry;
use crate::systems::fields::FieldLayout;

/// Setup parameters for a [`FarmWorld`](crate::api::FarmWorld).
#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Field blocks created at startup.
    pub fields: Vec<FieldLayout>,
    /// Species registered in addition to the built-in ones.
    pub species: SpeciesRegistry,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            fields: vec![FieldLayout::default()],
            species: SpeciesRegistry::new(),
        }
    }
}

impl FarmConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)?;
        for id in config.species.ids() {
            config.species.get(id)?.validate(id)?;
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmError;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(FarmConfig::from_json("{}").unwrap(), FarmConfig::default());
    }

    #[test]
    fn test_custom_layouts_and_species() {
        let json = r#"{
            "fields": [
                {"name": "plot", "vert_start": 0, "vert_size": 2, "horz_start": 0, "horz_size": 2}
            ],
            "species": {
                "radish": {
                    "stages": [
                        {"min_days": 1, "water": 1, "sun": 1, "gfx": "radish_1"},
                        {"min_days": 1, "water": 0, "sun": 0, "gfx": "radish_2"}
                    ],
                    "ripe": 1,
                    "harvested": 1
                }
            }
        }"#;

        let config = FarmConfig::from_json(json).unwrap();

        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].name, "plot");
        assert!(config.species.contains("radish"));
        assert_eq!(config.species.get("radish").unwrap().regrows, None);
    }

    #[test]
    fn test_invalid_species_is_rejected() {
        let json = r#"{
            "species": {
                "weed": {"stages": [], "ripe": 0, "harvested": 0}
            }
        }"#;

        assert!(matches!(
            FarmConfig::from_json(json),
            Err(FarmError::InvalidSpecies { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            FarmConfig::from_json("{\"fields\": 3}"),
            Err(FarmError::Config(_))
        ));
    }
}
