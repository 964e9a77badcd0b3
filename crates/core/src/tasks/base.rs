//! Plugin task trait and error types.
//!
//! A plugin task is a pure function of (content record, optional input data)
//! to a data payload. Tasks signal failure through [`TaskError`] and never
//! let faults escape the task boundary; the harness converts every error
//! into a failed [`ck_protocol::TaskResult`].

use async_trait::async_trait;
use ck_protocol::content_models::ContentRecord;
use ck_protocol::task_models::ErrorCode;
use serde_json::Value;
use thiserror::Error;

/// Errors a plugin task may return.
///
/// Validation errors are never retried. Execution errors are retried only
/// when the task tags them retryable. Timeouts are produced by the harness
/// when the per-step deadline elapses and are always retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The content or step input failed structural checks.
    #[error("Content validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// An internal fault inside the task.
    #[error("Execution failed: {message}")]
    Execution { message: String, retryable: bool },

    /// The step's external call exceeded its deadline.
    #[error("Step timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl TaskError {
    /// A non-retryable execution error.
    pub fn execution(message: impl Into<String>) -> Self {
        TaskError::Execution {
            message: message.into(),
            retryable: false,
        }
    }

    /// An execution error tagged retryable (transient external fault).
    pub fn retryable(message: impl Into<String>) -> Self {
        TaskError::Execution {
            message: message.into(),
            retryable: true,
        }
    }

    /// The result-envelope error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TaskError::Validation(_) => ErrorCode::Validation,
            TaskError::Execution { .. } => ErrorCode::Execution,
            TaskError::Timeout { .. } => ErrorCode::Timeout,
        }
    }

    /// Whether the sequencer may retry after this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            TaskError::Validation(_) => false,
            TaskError::Execution { retryable, .. } => *retryable,
            TaskError::Timeout { .. } => true,
        }
    }
}

/// A named unit of work invoked by the sequencer.
///
/// Implementations must be pure with respect to the record (records are
/// read-only to the pipeline) and must return all failures as [`TaskError`]
/// values rather than panicking.
#[async_trait]
pub trait PluginTask: Send + Sync {
    /// The step name this task is registered under.
    fn name(&self) -> &str;

    /// Execute the task against a record with input resolved from the run
    /// context (`None` when the step declares no input or the optional key
    /// was absent).
    async fn execute(
        &self,
        content: &ContentRecord,
        input: Option<Value>,
    ) -> Result<Value, TaskError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TaskError::Validation(vec!["x".into()]).code(),
            ErrorCode::Validation
        );
        assert_eq!(TaskError::execution("x").code(), ErrorCode::Execution);
        assert_eq!(TaskError::Timeout { seconds: 5 }.code(), ErrorCode::Timeout);
    }

    #[test]
    fn test_retryability() {
        assert!(!TaskError::Validation(vec![]).is_retryable());
        assert!(!TaskError::execution("boom").is_retryable());
        assert!(TaskError::retryable("flaky upstream").is_retryable());
        assert!(TaskError::Timeout { seconds: 5 }.is_retryable());
    }

    #[test]
    fn test_validation_message_joins_issues() {
        let err = TaskError::Validation(vec![
            "Missing or empty id".to_string(),
            "Missing title and body".to_string(),
        ]);
        let message = err.to_string();
        assert!(message.contains("Missing or empty id, Missing title and body"));
    }
}
