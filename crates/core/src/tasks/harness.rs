//! Task execution harness.
//!
//! The harness enforces the standardized result contract around every task
//! invocation: structural validation runs before any work, faults are caught
//! and converted into failed results instead of propagating, the per-step
//! deadline is applied at the task boundary, and metadata is populated
//! regardless of success so failures remain traceable to a content item.

use crate::tasks::base::{PluginTask, TaskError};
use crate::tasks::util::validate_for_processing;
use ck_protocol::content_models::ContentRecord;
use ck_protocol::task_models::{ErrorCode, TaskMetadata, TaskResult};
use serde_json::Value;
use std::time::Duration;

/// Invoke one task against one record and return the standardized envelope.
///
/// The returned result never carries a fault out of the task: validation
/// failures, execution errors, and timeouts all come back as failed
/// [`TaskResult`]s with the matching error code.
pub async fn run_task(
    task: &dyn PluginTask,
    content: &ContentRecord,
    input: Option<Value>,
    timeout: Duration,
) -> TaskResult {
    let metadata = TaskMetadata::from_record(content);

    let check = validate_for_processing(content);
    if !check.is_valid() {
        return TaskResult::failed(
            task.name(),
            format!("Content validation failed: {}", check.issues.join(", ")),
            ErrorCode::Validation,
            false,
            metadata,
        );
    }

    match tokio::time::timeout(timeout, task.execute(content, input)).await {
        Ok(Ok(data)) => TaskResult::ok(task.name(), data, metadata),
        Ok(Err(err)) => {
            tracing::warn!(task = task.name(), content_id = %content.id, error = %err, "task failed");
            TaskResult::failed(task.name(), err.to_string(), err.code(), err.is_retryable(), metadata)
        }
        Err(_) => {
            let err = TaskError::Timeout {
                seconds: timeout.as_secs(),
            };
            tracing::warn!(task = task.name(), content_id = %content.id, "task timed out");
            TaskResult::failed(task.name(), err.to_string(), ErrorCode::Timeout, true, metadata)
        }
    }
}
