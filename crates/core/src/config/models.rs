//! Assembled, validated configuration.
//!
//! [`PipelineDefinition`] is the in-memory form of everything under
//! `.content-kit/`: the named pipelines, the context-passing table, and the
//! branching tables. It is built once by the loader, validated against the
//! task registry, and treated as immutable for the lifetime of the process;
//! concurrent runs share it behind an `Arc` without synchronization.

use crate::config::error::{ConfigError, ConfigResult};
use crate::tasks::registry::TaskRegistry;
use ck_protocol::config_models::GlobalConfig;
use ck_protocol::pipeline_models::{BranchingTable, ContextRule, FlowTable, PipelineSpec, SubtypeSelector};
use std::collections::HashMap;

/// Complete application configuration loaded from `.content-kit/`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    /// Global engine and scoring settings.
    pub global: GlobalConfig,

    /// The validated pipeline definition.
    pub definition: PipelineDefinition,
}

/// The declarative pipeline definition, loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineDefinition {
    /// Pipeline name -> ordered step names.
    pub pipelines: HashMap<String, Vec<String>>,

    /// Step name -> data-flow rule. Steps without an entry use the default
    /// rule (no input, output key equal to the step name, not required).
    pub flow: HashMap<String, ContextRule>,

    /// Sub-pipeline name -> ordered step names.
    pub sub_pipelines: HashMap<String, Vec<String>>,

    /// Step name -> subtype selector -> sub-pipeline name.
    pub branching: HashMap<String, HashMap<SubtypeSelector, String>>,
}

impl PipelineDefinition {
    /// Assemble a definition from parsed configuration files.
    pub fn assemble(
        specs: Vec<PipelineSpec>,
        flow: FlowTable,
        branching: BranchingTable,
    ) -> Self {
        Self {
            pipelines: specs.into_iter().map(|s| (s.name, s.steps)).collect(),
            flow: flow.context,
            sub_pipelines: branching.sub_pipelines,
            branching: branching.branching,
        }
    }

    /// Ordered steps of a named pipeline.
    pub fn pipeline(&self, name: &str) -> Option<&[String]> {
        self.pipelines.get(name).map(Vec::as_slice)
    }

    /// All pipeline names, sorted for stable listings.
    pub fn pipeline_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pipelines.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The data-flow rule declared for a step, if any.
    pub fn rule(&self, step: &str) -> Option<&ContextRule> {
        self.flow.get(step)
    }

    /// Validate the definition against a task registry.
    ///
    /// Checks, in order:
    /// 1. every step in every pipeline resolves to a registered task or has
    ///    a branching entry
    /// 2. every branching entry targets a defined sub-pipeline
    /// 3. every sub-pipeline step resolves to a registered task (sub-pipelines
    ///    are expanded exactly one level and never branch again)
    /// 4. output keys are owned by exactly one step per pipeline, counting
    ///    every step reachable through branching
    ///
    /// Fails with the first violation; the definition is unusable on error.
    pub fn validate(&self, registry: &TaskRegistry) -> ConfigResult<()> {
        for (name, steps) in &self.pipelines {
            for step in steps {
                if !registry.has_task(step) && !self.branching.contains_key(step.as_str()) {
                    return Err(ConfigError::UnresolvedStep {
                        step: step.clone(),
                        referenced_by: format!("pipeline '{}'", name),
                    });
                }
            }
        }

        for (step, targets) in &self.branching {
            for target in targets.values() {
                if !self.sub_pipelines.contains_key(target) {
                    return Err(ConfigError::UnknownSubPipeline {
                        step: step.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        for (name, steps) in &self.sub_pipelines {
            for step in steps {
                if !registry.has_task(step) {
                    return Err(ConfigError::UnresolvedStep {
                        step: step.clone(),
                        referenced_by: format!("sub-pipeline '{}'", name),
                    });
                }
            }
        }

        for (name, steps) in &self.pipelines {
            self.check_output_keys(name, steps)?;
        }

        Ok(())
    }

    /// Every step reachable within one pipeline, including each possible
    /// branching expansion and the leaf fallback.
    fn reachable_steps<'a>(&'a self, steps: &'a [String]) -> Vec<&'a str> {
        let mut reachable: Vec<&str> = Vec::new();
        for step in steps {
            reachable.push(step.as_str());
            if let Some(targets) = self.branching.get(step.as_str()) {
                for target in targets.values() {
                    if let Some(sub_steps) = self.sub_pipelines.get(target) {
                        reachable.extend(sub_steps.iter().map(String::as_str));
                    }
                }
            }
        }
        reachable
    }

    fn check_output_keys(&self, pipeline: &str, steps: &[String]) -> ConfigResult<()> {
        let default_rule = ContextRule::default();
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for step in self.reachable_steps(steps) {
            let rule = self.flow.get(step).unwrap_or(&default_rule);
            let key = rule.output_key_for(step);
            match owners.get(key) {
                Some(owner) if *owner != step => {
                    return Err(ConfigError::DuplicateOutputKey {
                        pipeline: pipeline.to_string(),
                        key: key.to_string(),
                        first: owner.to_string(),
                        second: step.to_string(),
                    });
                }
                _ => {
                    owners.insert(key, step);
                }
            }
        }
        Ok(())
    }
}
