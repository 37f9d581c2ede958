//! Named post-execution commands.
//!
//! Field actions carry command names only. The callbacks live in the
//! [`CommandRegistry`] resource and are resolved when an action finishes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use tracing::warn;

use crate::error::FarmError;

/// Callback run after a field action.
pub type CommandFn = Arc<dyn Fn(&mut World) + Send + Sync>;

/// Command callbacks by name.
#[derive(Resource, Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` under `name`, replacing any previous callback.
    pub fn register<F>(&mut self, name: impl Into<String>, command: F)
    where
        F: Fn(&mut World) + Send + Sync + 'static,
    {
        self.commands.insert(name.into(), Arc::new(command));
    }

    pub fn get(&self, name: &str) -> Option<CommandFn> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("CommandRegistry")
            .field("commands", &names)
            .finish()
    }
}

/// Run the named commands in order. Unknown names are skipped and returned
/// as errors; the remaining commands still run.
pub fn run_commands(world: &mut World, names: &[String]) -> Vec<FarmError> {
    let mut errors = Vec::new();
    for name in names {
        // The callback gets the whole world, so it is cloned out first.
        let command = world
            .get_resource::<CommandRegistry>()
            .and_then(|registry| registry.get(name));
        match command {
            Some(command) => command(world),
            None => {
                warn!(command = %name, "unknown post-execution command");
                errors.push(FarmError::UnknownCommand(name.clone()));
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Counter(u32);

    #[test]
    fn test_commands_run_in_order() {
        let mut world = World::new();
        world.insert_resource(Counter::default());
        let mut registry = CommandRegistry::new();
        registry.register("double", |world: &mut World| {
            world.resource_mut::<Counter>().0 *= 2;
        });
        registry.register("inc", |world: &mut World| {
            world.resource_mut::<Counter>().0 += 1;
        });
        world.insert_resource(registry);

        let names = vec!["inc".to_string(), "double".to_string(), "inc".to_string()];
        let errors = run_commands(&mut world, &names);

        assert!(errors.is_empty());
        assert_eq!(world.resource::<Counter>().0, 3);
    }

    #[test]
    fn test_unknown_command_does_not_stop_the_rest() {
        let mut world = World::new();
        world.insert_resource(Counter::default());
        let mut registry = CommandRegistry::new();
        registry.register("inc", |world: &mut World| {
            world.resource_mut::<Counter>().0 += 1;
        });
        world.insert_resource(registry);

        let names = vec!["missing".to_string(), "inc".to_string()];
        let errors = run_commands(&mut world, &names);

        assert_eq!(errors, vec![FarmError::UnknownCommand("missing".to_string())]);
        assert_eq!(world.resource::<Counter>().0, 1);
    }

    #[test]
    fn test_no_registry() {
        let mut world = World::new();
        assert!(run_commands(&mut world, &[]).is_empty());
        assert_eq!(run_commands(&mut world, &["refresh".to_string()]).len(), 1);
    }
}
