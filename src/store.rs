//! Identifier-based entity storage on top of the ECS world.
//!
//! Entities that other parts of the simulation refer to by name (fields,
//! crops, tool holders) carry an [`Identifier`] and are indexed in the
//! [`EntityRegistry`] resource.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use crate::components::Identifier;

/// Identifier to entity index.
#[derive(Resource, Debug, Default)]
pub struct EntityRegistry {
    by_id: HashMap<String, Entity>,
}

impl EntityRegistry {
    pub fn get(&self, identifier: &str) -> Option<Entity> {
        self.by_id.get(identifier).copied()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, entity: Entity) {
        self.by_id.insert(identifier.into(), entity);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Entity/component storage addressed by stable string identifiers.
pub trait WorldStore {
    /// Entity registered under `identifier`, if any.
    fn find_entity(&self, identifier: &str) -> Option<Entity>;

    fn is_identifier_used(&self, identifier: &str) -> bool {
        self.find_entity(identifier).is_some()
    }

    /// The entity registered under `identifier`, spawning it with
    /// `components` if it does not exist yet. Existing entities are returned
    /// untouched.
    fn get_or_create_entity<B: Bundle>(&mut self, identifier: &str, components: B) -> Entity;

    /// All entities carrying component `C`.
    fn all_entities_with<C: Component>(&mut self) -> Vec<Entity>;
}

impl WorldStore for World {
    fn find_entity(&self, identifier: &str) -> Option<Entity> {
        self.get_resource::<EntityRegistry>()
            .and_then(|registry| registry.get(identifier))
    }

    fn get_or_create_entity<B: Bundle>(&mut self, identifier: &str, components: B) -> Entity {
        if let Some(entity) = self.find_entity(identifier) {
            return entity;
        }
        let entity = self
            .spawn((Identifier(identifier.to_string()), components))
            .id();
        self.get_resource_or_insert_with(EntityRegistry::default)
            .insert(identifier, entity);
        entity
    }

    fn all_entities_with<C: Component>(&mut self) -> Vec<Entity> {
        let mut query = self.query_filtered::<Entity, With<C>>();
        let mut entities: Vec<Entity> = query.iter(self).collect();
        entities.sort();
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Field, GridPosition};

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut world = World::new();
        let first = world.get_or_create_entity("field_1_0_0", (Field::default(), GridPosition::new(0, 0)));
        let second = world.get_or_create_entity("field_1_0_0", (Field::plowed(), GridPosition::new(5, 5)));

        assert_eq!(first, second);
        assert!(!world.get::<Field>(first).unwrap().plowed);
        assert_eq!(world.get::<Identifier>(first).unwrap().as_str(), "field_1_0_0");
        assert_eq!(world.find_entity("field_1_0_0"), Some(first));
        assert!(world.is_identifier_used("field_1_0_0"));
        assert!(world.find_entity("field_1_0_1").is_none());
    }

    #[test]
    fn test_all_entities_with() {
        let mut world = World::new();
        let a = world.get_or_create_entity("a", Field::default());
        let _b = world.get_or_create_entity("b", GridPosition::new(1, 1));
        let c = world.get_or_create_entity("c", (Field::default(), GridPosition::new(2, 2)));

        assert_eq!(world.all_entities_with::<Field>(), vec![a, c]);
    }
}
