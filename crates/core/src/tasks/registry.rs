//! Task registry: the explicit step-name -> task table.
//!
//! The registry is constructed once at startup and passed by reference into
//! the sequencer and the configuration loader; there is no ambient global
//! table, so independent sequencers (e.g. in tests) hold independent
//! registries.

use crate::tasks::base::PluginTask;
use crate::tasks::builtin;
use ck_protocol::config_models::ScoringSettings;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps step names to invocable plugin tasks.
#[derive(Default, Clone)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<dyn PluginTask>>,
}

impl TaskRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    /// A registry holding the built-in content tasks, configured with
    /// default scoring settings.
    pub fn builtin() -> Self {
        Self::builtin_with(ScoringSettings::default())
    }

    /// A registry holding the built-in content tasks, configured with the
    /// given scoring settings.
    pub fn builtin_with(scoring: ScoringSettings) -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry, scoring);
        registry
    }

    /// Register a task under its own name. A task registered later under the
    /// same name replaces the earlier one.
    pub fn register<T: PluginTask + 'static>(&mut self, task: T) {
        self.tasks.insert(task.name().to_string(), Arc::new(task));
    }

    /// Register an already-shared task.
    pub fn register_arc(&mut self, task: Arc<dyn PluginTask>) {
        self.tasks.insert(task.name().to_string(), task);
    }

    /// Look up a task by step name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PluginTask>> {
        self.tasks.get(name).cloned()
    }

    /// Whether a task with the given name is registered.
    pub fn has_task(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// All registered task names, sorted for stable listings.
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
