//! Crop growth - planting, daily advance, harvest and appearance refresh.
//!
//! ## Daily advance
//!
//! `advance_day` has two phases:
//!
//! 1. **Gather** - every crop is evaluated against its species' stage table
//!    using the linked field's accumulated water/sun. Nothing is written, so
//!    a broken stage table or a dangling field link aborts the whole day.
//!    With `--features parallel` the evaluation runs on rayon.
//! 2. **Apply** - field accumulators are zeroed and the new crop state and
//!    appearance are written back.

use bevy_ecs::prelude::*;
use tracing::{debug, info, warn};

use crate::components::*;
use crate::error::{FarmError, Result};
use crate::species::{Species, SpeciesRegistry};
use crate::store::WorldStore;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What changed for one crop during a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthChange {
    pub advanced: bool,
    pub ripened: bool,
    pub regrown: bool,
}

/// Summary of one `advance_day` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayReport {
    pub crops: usize,
    pub advanced: usize,
    pub ripened: usize,
    pub regrown: usize,
}

/// Identifier of the crop planted on `field_id`.
pub fn crop_identifier(field_id: &str) -> String {
    format!("{}_crop", field_id)
}

/// Appearance for a stage of a species.
pub fn stage_appearance(species_id: &str, species: &Species, stage: usize) -> Result<Appearance> {
    let stage = species.stage(species_id, stage)?;
    Ok(Appearance::new(stage.gfx.clone()).with_namespace(stage.namespace.clone()))
}

/// Run one day's stage transition for a crop whose day counter and
/// accumulators have already been updated.
pub fn evaluate_growth(crop: &mut Crop, species: &Species) -> Result<GrowthChange> {
    let mut change = GrowthChange::default();

    if crop.harvested {
        match species.regrows {
            Some(regrows) if crop.days > 0 => {
                species.stage(&crop.species_id, regrows)?;
                crop.harvested = false;
                crop.stage = regrows;
                change.regrown = true;
            }
            _ => {
                species.stage(&crop.species_id, species.harvested)?;
                crop.stage = species.harvested;
            }
        }
    } else if crop.stage >= species.last_stage() || crop.ripe {
        // Waiting to be harvested.
    } else {
        let stage = species.stage(&crop.species_id, crop.stage)?;
        if stage.is_complete(crop.days, crop.water, crop.sun) {
            species.stage(&crop.species_id, crop.stage + 1)?;
            crop.reset_progress();
            crop.stage += 1;
            change.advanced = true;
            if crop.stage == species.ripe {
                crop.ripe = true;
                change.ripened = true;
            }
        }
    }

    // The current stage must always resolve, even when nothing changed.
    species.stage(&crop.species_id, crop.stage)?;
    Ok(change)
}

/// Plant a crop of `species_id` on a field.
///
/// Does nothing and returns `Ok(None)` if the field already has a crop.
/// The field is not checked for being plowed: callers that need that
/// invariant (the sow action) check [`Field::can_receive_crop`] first.
pub fn plant(world: &mut World, field_entity: Entity, species_id: &str) -> Result<Option<Entity>> {
    let field = world
        .get::<Field>(field_entity)
        .copied()
        .ok_or(FarmError::NotAField(field_entity))?;
    if field.has_plant {
        debug!(?field_entity, "field already planted");
        return Ok(None);
    }

    let appearance = {
        let registry = world
            .get_resource::<SpeciesRegistry>()
            .ok_or_else(|| FarmError::UnknownSpecies(species_id.to_string()))?;
        stage_appearance(species_id, registry.get(species_id)?, 0)?
    };
    let field_id = world
        .get::<Identifier>(field_entity)
        .map(|id| id.0.clone())
        .ok_or(FarmError::NotAField(field_entity))?;
    let position = world
        .get::<GridPosition>(field_entity)
        .copied()
        .unwrap_or_default();

    let crop_id = crop_identifier(&field_id);
    let crop_entity = world.get_or_create_entity(
        &crop_id,
        CropBundle {
            crop: Crop::new(species_id, field_id.as_str()),
            position,
            appearance,
        },
    );
    if let Some(mut field) = world.get_mut::<Field>(field_entity) {
        field.has_plant = true;
    }

    debug!(crop = %crop_id, species = species_id, "planted crop");
    Ok(Some(crop_entity))
}

/// Harvest a ripe crop. Returns whether anything was harvested.
pub fn harvest(world: &mut World, crop_entity: Entity) -> Result<bool> {
    let Some(mut crop) = world.get::<Crop>(crop_entity).cloned() else {
        return Ok(false);
    };
    if !crop.ripe {
        return Ok(false);
    }

    let appearance = {
        let registry = world
            .get_resource::<SpeciesRegistry>()
            .ok_or_else(|| FarmError::UnknownSpecies(crop.species_id.clone()))?;
        let species = registry.get(&crop.species_id)?;
        crop.ripe = false;
        crop.harvested = true;
        crop.reset_progress();
        crop.stage = species.harvested;
        stage_appearance(&crop.species_id, species, crop.stage)?
    };

    debug!(field = %crop.field_id, "harvested crop");
    world.entity_mut(crop_entity).insert((crop, appearance));
    Ok(true)
}

struct PendingCrop {
    entity: Entity,
    field: Entity,
    crop: Crop,
}

struct EvaluatedCrop {
    entity: Entity,
    field: Entity,
    crop: Crop,
    appearance: Appearance,
    change: GrowthChange,
}

impl PendingCrop {
    fn evaluate(mut self, registry: &SpeciesRegistry) -> Result<EvaluatedCrop> {
        let species = registry.get(&self.crop.species_id)?;
        let change = evaluate_growth(&mut self.crop, species)?;
        let appearance = stage_appearance(&self.crop.species_id, species, self.crop.stage)?;
        Ok(EvaluatedCrop {
            entity: self.entity,
            field: self.field,
            crop: self.crop,
            appearance,
            change,
        })
    }
}

/// Advance every crop by one day.
///
/// Folds each linked field's water/sun into its crop, counts the day and
/// runs the stage transition. Configuration errors abort the day before any
/// state is changed.
pub fn advance_day(world: &mut World) -> Result<DayReport> {
    // Gather phase
    let mut pending = Vec::new();
    {
        let mut query = world.query::<(Entity, &Crop)>();
        let crops: Vec<(Entity, Crop)> = query.iter(world).map(|(e, c)| (e, c.clone())).collect();
        for (entity, mut crop) in crops {
            let field_entity = world
                .find_entity(&crop.field_id)
                .ok_or_else(|| FarmError::UnknownEntity(crop.field_id.clone()))?;
            let field = world
                .get::<Field>(field_entity)
                .ok_or(FarmError::NotAField(field_entity))?;
            crop.add_water(field.water);
            crop.add_sun(field.sun);
            crop.add_days(1);
            pending.push(PendingCrop {
                entity,
                field: field_entity,
                crop,
            });
        }
    }

    let empty = SpeciesRegistry::new();
    let registry = world.get_resource::<SpeciesRegistry>().unwrap_or(&empty);

    #[cfg(feature = "parallel")]
    let evaluated: Vec<Result<EvaluatedCrop>> = pending
        .into_par_iter()
        .map(|p| p.evaluate(registry))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let evaluated: Vec<Result<EvaluatedCrop>> =
        pending.into_iter().map(|p| p.evaluate(registry)).collect();

    let evaluated = evaluated.into_iter().collect::<Result<Vec<_>>>()?;

    // Apply phase
    let mut report = DayReport::default();
    for result in evaluated {
        if let Some(mut field) = world.get_mut::<Field>(result.field) {
            field.take_exposure();
        }
        report.crops += 1;
        report.advanced += result.change.advanced as usize;
        report.ripened += result.change.ripened as usize;
        report.regrown += result.change.regrown as usize;
        world
            .entity_mut(result.entity)
            .insert((result.crop, result.appearance));
    }

    info!(
        crops = report.crops,
        advanced = report.advanced,
        ripened = report.ripened,
        regrown = report.regrown,
        "day advanced"
    );
    Ok(report)
}

/// System that refreshes each crop's appearance from its current stage.
/// Performs no stage transitions.
pub fn crop_appearance_system(
    registry: Res<SpeciesRegistry>,
    mut query: Query<(&Crop, &mut Appearance)>,
) {
    for (crop, mut appearance) in query.iter_mut() {
        let refreshed = registry
            .get(&crop.species_id)
            .and_then(|species| stage_appearance(&crop.species_id, species, crop.stage));
        match refreshed {
            Ok(new) => {
                if *appearance != new {
                    *appearance = new;
                }
            }
            Err(err) => warn!(field = %crop.field_id, %err, "cannot refresh crop appearance"),
        }
    }
}
