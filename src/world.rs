//! Snapshot types.
//!
//! The `Snapshot` struct provides a serializable view of the farm state that
//! a client can use for visualization or debugging. JSON encoding lives in
//! [`crate::systems::serialization`].

use crate::components::*;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single field cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub plowed: bool,
    pub water: u32,
    pub sun: u32,
    pub has_plant: bool,
    pub gfx: String,
}

/// Snapshot of a single crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSnapshot {
    pub id: String,
    pub field_id: String,
    pub species_id: String,
    pub stage: usize,
    pub ripe: bool,
    pub harvested: bool,
    pub water: u32,
    pub sun: u32,
    pub days: u32,
    pub gfx: String,
}

/// Complete farm state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of days advanced so far.
    pub day: u64,
    /// All fields, sorted by identifier.
    pub fields: Vec<FieldSnapshot>,
    /// All crops, sorted by identifier.
    pub crops: Vec<CropSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, day: u64) -> Self {
        let mut fields = Vec::new();
        let mut field_query =
            world.query::<(&Identifier, &Field, Option<&GridPosition>, Option<&Appearance>)>();
        for (id, field, pos, appearance) in field_query.iter(world) {
            let pos = pos.copied().unwrap_or_default();
            fields.push(FieldSnapshot {
                id: id.0.clone(),
                x: pos.x,
                y: pos.y,
                plowed: field.plowed,
                water: field.water,
                sun: field.sun,
                has_plant: field.has_plant,
                gfx: appearance.map(|a| a.gfx.clone()).unwrap_or_default(),
            });
        }
        fields.sort_by(|a, b| a.id.cmp(&b.id));

        let mut crops = Vec::new();
        let mut crop_query = world.query::<(&Identifier, &Crop, Option<&Appearance>)>();
        for (id, crop, appearance) in crop_query.iter(world) {
            crops.push(CropSnapshot {
                id: id.0.clone(),
                field_id: crop.field_id.clone(),
                species_id: crop.species_id.clone(),
                stage: crop.stage,
                ripe: crop.ripe,
                harvested: crop.harvested,
                water: crop.water,
                sun: crop.sun,
                days: crop.days,
                gfx: appearance.map(|a| a.gfx.clone()).unwrap_or_default(),
            });
        }
        crops.sort_by(|a, b| a.id.cmp(&b.id));

        Self { day, fields, crops }
    }

    pub fn field(&self, id: &str) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn crop(&self, id: &str) -> Option<&CropSnapshot> {
        self.crops.iter().find(|c| c.id == id)
    }
}
