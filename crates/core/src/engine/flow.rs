//! Context passing / data-flow manager.
//!
//! Resolves each step's input from the run context and records outputs under
//! the step's declared keys. Steps are decoupled from each other's existence:
//! a step only knows the name of the context key it reads and writes, never
//! the identity of the step that produced it.

use crate::config::models::PipelineDefinition;
use ck_protocol::pipeline_models::ContextRule;
use ck_protocol::run_models::RunContext;
use ck_protocol::task_models::TaskResult;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Data-flow failures surfaced while resolving inputs or recording outputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A step declared a required input key that is absent from the context.
    #[error("missing required input key '{key}' for step '{step}'")]
    MissingInput { step: String, key: String },

    /// A step tried to write a key that is already present.
    ///
    /// Load-time validation rejects definitions where this can happen; the
    /// runtime check keeps the no-silent-overwrite invariant regardless.
    #[error("output key '{key}' already present when recording step '{step}'")]
    DuplicateKey { step: String, key: String },
}

/// Applies the context-passing table of a pipeline definition.
pub struct DataFlowManager {
    definition: Arc<PipelineDefinition>,
}

impl DataFlowManager {
    pub fn new(definition: Arc<PipelineDefinition>) -> Self {
        Self { definition }
    }

    /// The rule governing a step, or the default rule when the flow table
    /// has no entry for it.
    pub fn rule_for(&self, step: &str) -> ContextRule {
        self.definition.rule(step).cloned().unwrap_or_default()
    }

    /// Resolve a step's input from the context.
    ///
    /// Returns `Ok(None)` when the step declares no input, or declares an
    /// optional input whose key is absent. A required-but-absent key is an
    /// input-resolution failure naming the missing key.
    pub fn resolve_input(&self, step: &str, ctx: &RunContext) -> Result<Option<Value>, FlowError> {
        let rule = self.rule_for(step);
        match rule.input_key.as_deref() {
            None => Ok(None),
            Some(key) => match ctx.value(key) {
                Some(value) => Ok(Some(value.clone())),
                None if rule.required => Err(FlowError::MissingInput {
                    step: step.to_string(),
                    key: key.to_string(),
                }),
                None => Ok(None),
            },
        }
    }

    /// Record a successful result: the `data` payload under the step's
    /// declared output key, and the full result under the step's audit entry.
    pub fn record_output(
        &self,
        step: &str,
        ctx: &mut RunContext,
        result: TaskResult,
    ) -> Result<(), FlowError> {
        let rule = self.rule_for(step);
        let key = rule.output_key_for(step).to_string();

        if ctx.values.contains_key(&key) {
            return Err(FlowError::DuplicateKey {
                step: step.to_string(),
                key,
            });
        }
        if ctx.results.contains_key(step) {
            return Err(FlowError::DuplicateKey {
                step: step.to_string(),
                key: step.to_string(),
            });
        }

        ctx.values
            .insert(key, result.data.clone().unwrap_or(Value::Null));
        ctx.results.insert(step.to_string(), result);
        Ok(())
    }

    /// Record a failed result under the step's audit entry only; failed
    /// steps never publish an output key.
    pub fn record_failure(&self, step: &str, ctx: &mut RunContext, result: TaskResult) {
        ctx.results.insert(step.to_string(), result);
    }
}
