//! ECS Components for the farm simulation.
//!
//! Components are pure data containers attached to entities.
//! Game logic lives in the action engine and the crop/field systems.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

// ============================================================================
// SPATIAL / IDENTITY COMPONENTS
// ============================================================================

/// Integer cell on the farm grid (x = columns, y = rows growing south).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell at a `(dy, dx)` offset from this one.
    pub fn offset(&self, dy: i32, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Stable string identifier of an entity.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derived display identifier (sprite name and optional namespace).
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub gfx: String,
    pub namespace: Option<String>,
}

impl Appearance {
    pub fn new(gfx: impl Into<String>) -> Self {
        Self {
            gfx: gfx.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }
}

// ============================================================================
// FIELD & CROP COMPONENTS
// ============================================================================

/// A farmable cell. `water` and `sun` accumulate during the day and are
/// folded into the planted crop when the day advances.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub plowed: bool,
    pub water: u32,
    pub sun: u32,
    /// Set once a crop referencing this field exists.
    pub has_plant: bool,
}

impl Field {
    pub fn plowed() -> Self {
        Self {
            plowed: true,
            ..Default::default()
        }
    }

    /// Whether a crop may be planted here.
    pub fn can_receive_crop(&self) -> bool {
        self.plowed && !self.has_plant
    }

    pub fn is_watered(&self) -> bool {
        self.water > 0
    }

    pub fn add_water(&mut self, amount: u32) {
        self.water = self.water.saturating_add(amount);
    }

    pub fn add_sun(&mut self, amount: u32) {
        self.sun = self.sun.saturating_add(amount);
    }

    /// Take the day's water and sun, leaving both at zero.
    pub fn take_exposure(&mut self) -> (u32, u32) {
        let exposure = (self.water, self.sun);
        self.water = 0;
        self.sun = 0;
        exposure
    }
}

/// A planted crop, linked to its field by identifier.
///
/// `water`, `sun` and `days` count towards the current stage's thresholds.
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub species_id: String,
    pub field_id: String,
    pub water: u32,
    pub sun: u32,
    pub days: u32,
    pub stage: usize,
    pub ripe: bool,
    pub harvested: bool,
}

impl Crop {
    pub fn new(species_id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            species_id: species_id.into(),
            field_id: field_id.into(),
            ..Default::default()
        }
    }

    pub fn add_water(&mut self, amount: u32) {
        self.water = self.water.saturating_add(amount);
    }

    pub fn add_sun(&mut self, amount: u32) {
        self.sun = self.sun.saturating_add(amount);
    }

    pub fn add_days(&mut self, days: u32) {
        self.days = self.days.saturating_add(days);
    }

    /// Clear progress towards the current stage.
    pub fn reset_progress(&mut self) {
        self.water = 0;
        self.sun = 0;
        self.days = 0;
    }
}

// ============================================================================
// TOOL & CONTAINER COMPONENTS
// ============================================================================

/// Kind of tool an actor is holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Plow,
    WateringCan,
    Seeds,
}

/// A tool's reach around its holder.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub kind: ToolKind,
    /// Columns reachable on each side of the holder.
    pub h_reach: u32,
    /// Rows reachable in front of the holder (and behind, with `reach_behind`).
    pub v_reach: u32,
    pub reach_behind: bool,
}

impl Tool {
    pub fn new(kind: ToolKind, h_reach: u32, v_reach: u32, reach_behind: bool) -> Self {
        Self {
            kind,
            h_reach,
            v_reach,
            reach_behind,
        }
    }

    /// Default reach for each tool kind.
    pub fn preset(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Plow => Self::new(kind, 3, 3, false),
            ToolKind::WateringCan | ToolKind::Seeds => Self::new(kind, 3, 3, true),
        }
    }

    /// Full reach rectangle, north-relative, centred on the holder's column.
    pub fn reach_rect(&self) -> Rect {
        let rows = if self.reach_behind {
            self.v_reach * 2
        } else {
            self.v_reach
        };
        Rect::new(
            -(self.h_reach as i32),
            -(self.v_reach as i32),
            self.h_reach * 2 + 1,
            rows + 1,
        )
    }
}

/// A consumable budget of units (water or seeds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContainer {
    pub capacity: u32,
    pub remaining: u32,
}

impl ResourceContainer {
    pub fn full(capacity: u32) -> Self {
        Self {
            capacity,
            remaining: capacity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Use up one unit. An empty container stays empty.
    pub fn consume_one(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn refill(&mut self) {
        self.remaining = self.capacity;
    }
}

/// Water carried by a tool holder.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterContainer(pub ResourceContainer);

impl WaterContainer {
    pub fn full(capacity: u32) -> Self {
        Self(ResourceContainer::full(capacity))
    }
}

/// Seeds of one species carried by a tool holder.
#[derive(Component, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedContainer {
    pub seeds: ResourceContainer,
    pub species_id: String,
}

impl SeedContainer {
    pub fn full(capacity: u32, species_id: impl Into<String>) -> Self {
        Self {
            seeds: ResourceContainer::full(capacity),
            species_id: species_id.into(),
        }
    }
}

// ============================================================================
// BUNDLES
// ============================================================================

/// Bundle for spawning a field cell.
#[derive(Bundle, Clone)]
pub struct FieldBundle {
    pub field: Field,
    pub position: GridPosition,
    pub appearance: Appearance,
}

impl FieldBundle {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            field: Field::default(),
            position: GridPosition::new(x, y),
            appearance: Appearance::new(crate::systems::fields::SOIL_GFX),
        }
    }
}

/// Bundle for spawning a crop on top of its field.
#[derive(Bundle, Clone)]
pub struct CropBundle {
    pub crop: Crop,
    pub position: GridPosition,
    pub appearance: Appearance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_floor() {
        let mut container = ResourceContainer::full(1);
        container.consume_one();
        assert!(container.is_empty());
        container.consume_one();
        assert_eq!(container.remaining, 0);
        container.refill();
        assert_eq!(container.remaining, 1);
    }

    #[test]
    fn test_field_take_exposure() {
        let mut field = Field::plowed();
        field.add_water(2);
        field.add_sun(3);
        assert_eq!(field.take_exposure(), (2, 3));
        assert_eq!((field.water, field.sun), (0, 0));
        assert!(field.can_receive_crop());
    }

    #[test]
    fn test_tool_reach_rect() {
        let plow = Tool::preset(ToolKind::Plow);
        assert_eq!(plow.reach_rect(), Rect::new(-3, -3, 7, 4));

        let can = Tool::preset(ToolKind::WateringCan);
        assert_eq!(can.reach_rect(), Rect::new(-3, -3, 7, 7));
    }
}
