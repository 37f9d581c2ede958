//! Public API for the farm simulation.
//!
//! [`FarmWorld`] is the interface a client (game loop, UI, demo) uses to
//! drive the simulation: it owns the ECS world, sets up the field layouts and
//! exposes the tool actions and the daily tick by identifier.
//!
//! ## Refresh
//!
//! Appearance and grid occupancy are derived state. They are rebuilt by the
//! refresh schedule, which runs after every day advance and harvest, after
//! each tool action (through the `refresh` post-execution command) and on
//! demand via [`FarmWorld::refresh`].

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ScheduleLabel;
use tracing::{info, warn};

use crate::actions::{
    highlight_targets, ActionOutcome, AreaAction, CommandRegistry, FieldActionKind, Plow, Sow,
    TargetHighlight, Water,
};
use crate::components::*;
use crate::config::FarmConfig;
use crate::error::{FarmError, Result};
use crate::geometry::{CellOffset, Direction, Rect};
use crate::reach::selection_bounds;
use crate::spatial::{field_grid_update_system, FieldGrid};
use crate::species::SpeciesRegistry;
use crate::store::{EntityRegistry, WorldStore};
use crate::systems::*;
use crate::world::Snapshot;

/// Name of the command that runs the refresh schedule.
pub const REFRESH_COMMAND: &str = "refresh";

/// Schedule rebuilding grid occupancy and appearances.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FarmRefresh;

fn refresh_schedule() -> Schedule {
    let mut schedule = Schedule::new(FarmRefresh);
    schedule.add_systems(
        (
            field_grid_update_system,
            field_appearance_system,
            crop_appearance_system,
        )
            .chain(),
    );
    schedule
}

fn run_refresh(world: &mut World) {
    if let Err(err) = world.try_run_schedule(FarmRefresh) {
        warn!(%err, "refresh schedule unavailable");
    }
}

/// The field action a tool performs when used by `holder`.
pub fn action_for_tool(kind: ToolKind, holder: Entity) -> FieldActionKind {
    match kind {
        ToolKind::Plow => Plow.into(),
        ToolKind::WateringCan => Water::new(holder).into(),
        ToolKind::Seeds => Sow::new(holder).into(),
    }
}

/// The main farm container.
///
/// Holds the ECS world and the day counter, providing a clean API for:
/// - Setting up fields and actors
/// - Using tools on a selection
/// - Advancing days and harvesting
/// - Extracting state snapshots
pub struct FarmWorld {
    world: World,
    day: u64,
}

impl FarmWorld {
    /// Create a farm with the default configuration.
    pub fn new() -> Self {
        Self::build(FarmConfig::default(), SpeciesRegistry::with_defaults())
    }

    /// Create a farm from a configuration. Extra species never replace the
    /// built-in ones.
    pub fn with_config(config: FarmConfig) -> Result<Self> {
        let mut species = SpeciesRegistry::with_defaults();
        species.merge(config.species.clone())?;
        Ok(Self::build(config, species))
    }

    fn build(config: FarmConfig, species: SpeciesRegistry) -> Self {
        let mut world = World::new();

        world.insert_resource(EntityRegistry::default());
        world.insert_resource(FieldGrid::new());
        world.insert_resource(species);

        let mut commands = CommandRegistry::new();
        commands.register(REFRESH_COMMAND, run_refresh);
        world.insert_resource(commands);
        world.add_schedule(refresh_schedule());

        let mut created = 0;
        for layout in &config.fields {
            created += setup_field(&mut world, layout);
        }
        info!(layouts = config.fields.len(), fields = created, "farm created");
        world.insert_resource(config);

        let mut farm = Self { world, day: 0 };
        farm.refresh();
        farm
    }

    /// Rebuild grid occupancy and appearances.
    pub fn refresh(&mut self) {
        run_refresh(&mut self.world);
    }

    /// Entity registered under `identifier`.
    pub fn entity(&self, identifier: &str) -> Result<Entity> {
        self.world
            .find_entity(identifier)
            .ok_or_else(|| FarmError::UnknownEntity(identifier.to_string()))
    }

    /// Spawn (or move) a tool holder at a cell.
    pub fn spawn_actor(&mut self, identifier: &str, x: i32, y: i32, tool: Tool) -> Entity {
        let entity = self
            .world
            .get_or_create_entity(identifier, (GridPosition::new(x, y), tool));
        self.world
            .entity_mut(entity)
            .insert((GridPosition::new(x, y), tool));
        self.refresh();
        entity
    }

    /// Give an actor a full water container.
    pub fn bind_water_container(&mut self, actor_id: &str, capacity: u32) -> Result<()> {
        let actor = self.entity(actor_id)?;
        self.world
            .entity_mut(actor)
            .insert(WaterContainer::full(capacity));
        Ok(())
    }

    /// Give an actor a full seed container of one species.
    pub fn bind_seed_container(
        &mut self,
        actor_id: &str,
        capacity: u32,
        species_id: &str,
    ) -> Result<()> {
        let actor = self.entity(actor_id)?;
        self.world
            .resource::<SpeciesRegistry>()
            .get(species_id)?;
        self.world
            .entity_mut(actor)
            .insert(SeedContainer::full(capacity, species_id));
        Ok(())
    }

    /// Refill every container the actor carries.
    pub fn refill(&mut self, actor_id: &str) -> Result<()> {
        let actor = self.entity(actor_id)?;
        if let Some(mut water) = self.world.get_mut::<WaterContainer>(actor) {
            water.0.refill();
        }
        if let Some(mut seeds) = self.world.get_mut::<SeedContainer>(actor) {
            seeds.seeds.refill();
        }
        Ok(())
    }

    /// Selection spanning two corner offsets, if the actor's tool allows it.
    pub fn select(&self, actor_id: &str, start: CellOffset, end: CellOffset) -> Result<Option<Rect>> {
        let actor = self.entity(actor_id)?;
        let Some(tool) = self.world.get::<Tool>(actor) else {
            return Ok(None);
        };
        let rect = selection_bounds(start, end);
        if tool.is_selection_valid(rect) && tool.is_rect_in_reach(rect) {
            Ok(Some(rect))
        } else {
            Ok(None)
        }
    }

    /// Plow the fields in `rect` around an actor.
    pub fn plow(&mut self, actor_id: &str, rect: Rect, direction: Direction) -> Result<ActionOutcome> {
        let actor = self.entity(actor_id)?;
        self.perform(AreaAction::new(actor, rect, direction, Plow))
    }

    /// Water the fields in `rect` from the actor's water container.
    pub fn water(&mut self, actor_id: &str, rect: Rect, direction: Direction) -> Result<ActionOutcome> {
        let actor = self.entity(actor_id)?;
        self.perform(AreaAction::new(actor, rect, direction, Water::new(actor)))
    }

    /// Sow the plowed fields in `rect` from the actor's seed container.
    pub fn sow(&mut self, actor_id: &str, rect: Rect, direction: Direction) -> Result<ActionOutcome> {
        let actor = self.entity(actor_id)?;
        self.perform(AreaAction::new(actor, rect, direction, Sow::new(actor)))
    }

    /// Use the actor's own tool on `rect`.
    pub fn use_tool(&mut self, actor_id: &str, rect: Rect, direction: Direction) -> Result<ActionOutcome> {
        let actor = self.entity(actor_id)?;
        let tool = self
            .world
            .get::<Tool>(actor)
            .copied()
            .ok_or_else(|| FarmError::UnknownEntity(format!("{actor_id} (no tool)")))?;
        self.perform(AreaAction::new(
            actor,
            rect,
            direction,
            action_for_tool(tool.kind, actor),
        ))
    }

    /// Execute an action, refreshing afterwards unless it already asks to.
    pub fn perform(&mut self, mut action: AreaAction) -> Result<ActionOutcome> {
        if !action.commands.iter().any(|c| c == REFRESH_COMMAND) {
            action.commands.push(REFRESH_COMMAND.to_string());
        }
        // Occupancy must reflect entities spawned since the last refresh.
        self.refresh();
        action.execute(&mut self.world)
    }

    /// Cells of `rect` the actor's tool could affect.
    pub fn highlight(&self, actor_id: &str, rect: Rect, direction: Direction) -> Result<TargetHighlight> {
        let actor = self.entity(actor_id)?;
        let origin = self
            .world
            .get::<GridPosition>(actor)
            .copied()
            .ok_or(FarmError::MissingGridPosition(actor))?;
        let tool = self
            .world
            .get::<Tool>(actor)
            .copied()
            .ok_or_else(|| FarmError::UnknownEntity(format!("{actor_id} (no tool)")))?;
        let action = action_for_tool(tool.kind, actor);
        let grid = self.world.resource::<FieldGrid>();
        Ok(highlight_targets(
            &self.world,
            grid,
            origin,
            rect,
            direction,
            &action,
        ))
    }

    /// Advance every crop by one day.
    pub fn advance_day(&mut self) -> Result<DayReport> {
        let report = advance_day(&mut self.world)?;
        self.day += 1;
        self.refresh();
        Ok(report)
    }

    /// Harvest the crop on a field. Returns whether it was ripe.
    pub fn harvest(&mut self, field_id: &str) -> Result<bool> {
        self.entity(field_id)?;
        let Some(crop) = self.world.find_entity(&crop_identifier(field_id)) else {
            return Ok(false);
        };
        let harvested = harvest(&mut self.world, crop)?;
        self.refresh();
        Ok(harvested)
    }

    /// Plant directly on a field, bypassing tools and containers.
    pub fn plant(&mut self, field_id: &str, species_id: &str) -> Result<bool> {
        let field = self.entity(field_id)?;
        let planted = plant(&mut self.world, field, species_id)?.is_some();
        self.refresh();
        Ok(planted)
    }

    /// Add sunlight to a field for the current day.
    pub fn add_sun(&mut self, field_id: &str, amount: u32) -> Result<()> {
        let field = self.entity(field_id)?;
        add_sun(&mut self.world, field, amount)
    }

    /// Add water to a field for the current day.
    pub fn add_water(&mut self, field_id: &str, amount: u32) -> Result<()> {
        let field = self.entity(field_id)?;
        add_water(&mut self.world, field, amount)?;
        self.refresh();
        Ok(())
    }

    /// Register a post-execution command.
    pub fn register_command<F>(&mut self, name: impl Into<String>, command: F)
    where
        F: Fn(&mut World) + Send + Sync + 'static,
    {
        self.world
            .resource_mut::<CommandRegistry>()
            .register(name, command);
    }

    /// Get a snapshot of the current farm state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.day)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        snapshot_to_json_string(&self.snapshot()).unwrap_or_else(|err| {
            warn!(%err, "cannot encode snapshot");
            "{}".to_string()
        })
    }

    /// Number of days advanced so far.
    pub fn current_day(&self) -> u64 {
        self.day
    }

    /// Get the field grid (for debugging).
    pub fn field_grid(&self) -> &FieldGrid {
        self.world.resource::<FieldGrid>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for FarmWorld {
    fn default() -> Self {
        Self::new()
    }
}
