//! Runtime run state models.
//!
//! A [`Run`] tracks one pipeline execution against one content record: its
//! lifecycle status, per-step outcomes, accumulated logs, and the evolving
//! [`RunContext`] that carries data between steps.

use crate::content_models::ContentRecord;
use crate::task_models::{ErrorCode, TaskResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Lifecycle status of a pipeline run.
///
/// Normal progression: Pending -> Running -> Completed.
///
/// Special states:
/// - Failed: a step failed or was skipped for a missing required input
/// - Cancelled: the run-level cancellation signal was raised between steps
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run has been created but not started yet.
    Pending,

    /// Run is actively executing steps.
    Running,

    /// All resolved steps completed successfully.
    Completed,

    /// At least one step failed or was skipped.
    Failed,

    /// The run was cancelled between steps; the context is partial.
    Cancelled,
}

/// Outcome of a single resolved step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The task ran and returned a successful result.
    Succeeded,

    /// The task ran (possibly several attempts) and failed.
    Failed { error: String, code: ErrorCode },

    /// The step was never invoked because a required input key was absent.
    Skipped { missing_key: String },
}

impl StepOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

/// Per-step record in the run report.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Resolved step name (a sub-pipeline step when spliced).
    pub step: String,

    /// What happened to the step.
    pub outcome: StepOutcome,

    /// How many times the task was invoked (0 for skipped steps).
    pub attempts: u32,
}

/// The mutable per-execution store of step inputs and outputs.
///
/// `values` maps each step's declared output key to the `data` payload it
/// produced; `results` keeps the full [`TaskResult`] per step name for audit
/// and debugging. Keys are never overwritten silently.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunContext {
    /// The original content record, read-only to the pipeline.
    pub content: ContentRecord,

    /// Step output data by declared output key.
    #[serde(default)]
    pub values: HashMap<String, Value>,

    /// Full task results by step name.
    #[serde(default)]
    pub results: HashMap<String, TaskResult>,
}

impl RunContext {
    /// Create an empty context around a content record.
    pub fn new(content: ContentRecord) -> Self {
        Self {
            content,
            values: HashMap::new(),
            results: HashMap::new(),
        }
    }

    /// Look up a step output payload by its output key.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Look up the full audit result recorded for a step.
    pub fn result(&self, step: &str) -> Option<&TaskResult> {
        self.results.get(step)
    }
}

/// The state of a single pipeline execution.
///
/// Each run gets a unique id when created and owns its context; the only
/// state shared with concurrent runs is the immutable pipeline definition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Run {
    /// Unique identifier for this execution.
    pub id: Uuid,

    /// Name of the pipeline being executed.
    pub pipeline_name: String,

    /// Identifier of the content record this run processes.
    pub content_id: String,

    /// Current lifecycle status.
    pub status: RunStatus,

    /// Zero-based index of the current resolved step.
    pub current_step: usize,

    /// The step that first halted forward progress, if any.
    pub halted_at: Option<String>,

    /// Per-step outcomes in execution order.
    pub steps: Vec<StepReport>,

    /// Accumulated log messages from this execution.
    pub logs: Vec<String>,

    /// When the run was created.
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal status.
    pub completed_at: Option<DateTime<Utc>>,

    /// The evolving (finally: assembled) run context.
    pub context: RunContext,
}

impl Run {
    /// Whether every resolved step succeeded.
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Whether the run was cancelled before finishing.
    pub fn cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }
}
