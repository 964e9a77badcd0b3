//! Engine event protocol.
//!
//! The sequencer reports progress over a channel as it executes, so callers
//! (CLI, embedding services, tests) can observe a run without polling. Events
//! use tagged serialization so they can be forwarded over a wire as-is.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::run_models::RunStatus;

/// Status updates emitted by the engine during a pipeline run.
///
/// ```json
/// {
///   "type": "stepFailed",
///   "payload": {
///     "run_id": "uuid-here",
///     "step": "extract_keywords",
///     "error": "..."
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run has been created.
    RunStarted {
        run_id: Uuid,
        pipeline_name: String,
        content_id: String,
    },

    /// A run's lifecycle status has changed.
    RunStatusUpdate {
        run_id: Uuid,
        status: RunStatus,
        step_index: usize,
    },

    /// A resolved step is about to be invoked.
    StepStarted { run_id: Uuid, step: String },

    /// A resolved step completed successfully.
    StepCompleted { run_id: Uuid, step: String },

    /// A resolved step failed after its final attempt.
    StepFailed {
        run_id: Uuid,
        step: String,
        error: String,
    },

    /// A step was skipped because a required input key was absent.
    StepSkipped {
        run_id: Uuid,
        step: String,
        missing_key: String,
    },

    /// A run has produced new log output.
    RunLogChunk { run_id: Uuid, content: String },

    /// A run completed with every step succeeding.
    RunCompleted { run_id: Uuid },

    /// A run finished with a failure.
    RunError { run_id: Uuid, error: String },

    /// A run was cancelled between steps.
    RunCancelled { run_id: Uuid },
}
