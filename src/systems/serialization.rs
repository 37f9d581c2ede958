//! JSON encoding of farm snapshots.
//!
//! Every snapshot export goes through these helpers, so encoding failures
//! surface as [`FarmError::Config`](crate::error::FarmError::Config).

use crate::error::Result;
use crate::world::Snapshot;

/// Encode a snapshot as compact JSON bytes.
pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(snapshot)?)
}

/// Encode a snapshot as a compact JSON string.
pub fn snapshot_to_json_string(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Encode a snapshot as indented JSON, for logs and demos.
pub fn snapshot_to_json_pretty(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Decode a snapshot from JSON bytes.
pub fn snapshot_from_json(data: &[u8]) -> Result<Snapshot> {
    Ok(serde_json::from_slice(data)?)
}

/// Decode a snapshot from a JSON string.
pub fn snapshot_from_json_string(data: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarmError;
    use crate::world::{CropSnapshot, FieldSnapshot};

    fn planted_snapshot() -> Snapshot {
        Snapshot {
            day: 4,
            fields: vec![FieldSnapshot {
                id: "field_1_0_0".to_string(),
                x: -8,
                y: -10,
                plowed: true,
                water: 1,
                sun: 0,
                has_plant: true,
                gfx: "plowed_soil_watered".to_string(),
            }],
            crops: vec![CropSnapshot {
                id: "field_1_0_0_crop".to_string(),
                field_id: "field_1_0_0".to_string(),
                species_id: "tomato".to_string(),
                stage: 1,
                ripe: false,
                harvested: false,
                water: 2,
                sun: 3,
                days: 1,
                gfx: "tomato_2".to_string(),
            }],
        }
    }

    #[test]
    fn test_snapshot_from_json() {
        let snapshot = planted_snapshot();

        let bytes = snapshot_to_json(&snapshot).unwrap();
        let restored = snapshot_from_json(&bytes).unwrap();

        assert_eq!(restored.day, 4);
        assert_eq!(restored.crop("field_1_0_0_crop").unwrap().stage, 1);
        assert!(restored.field("field_1_0_0").unwrap().has_plant);
    }

    #[test]
    fn test_string_forms_agree() {
        let snapshot = planted_snapshot();
        let compact = snapshot_to_json_string(&snapshot).unwrap();
        let pretty = snapshot_to_json_pretty(&snapshot).unwrap();

        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(
            snapshot_from_json_string(&compact).unwrap(),
            snapshot_from_json_string(&pretty).unwrap()
        );
    }

    #[test]
    fn test_incomplete_snapshot_is_a_config_error() {
        assert!(matches!(
            snapshot_from_json_string("{\"day\": 1}"),
            Err(FarmError::Config(_))
        ));
    }
}
