//! The standardized task result envelope.
//!
//! Every plugin task returns a [`TaskResult`]: success flag, data payload on
//! success, error message and code on failure, and always-populated metadata
//! so failures stay traceable to a specific content item.

use crate::content_models::{ContentKind, ContentRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a task failure, so retry policy can tell transient failures
/// apart from structural ones.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The content or step input failed structural checks. Never retried.
    Validation,

    /// An internal fault inside the task.
    Execution,

    /// The step's external call exceeded its deadline. Always retryable.
    Timeout,
}

/// Bookkeeping attached to every task result, success or failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskMetadata {
    /// Identifier of the content item the task ran against.
    pub content_id: String,

    /// Title of the content item, if present.
    pub title: Option<String>,

    /// The content subtype.
    pub kind: ContentKind,

    /// Word count of the content body.
    pub word_count: usize,

    /// Whether the record carried an excerpt.
    pub has_excerpt: bool,

    /// Whether the record carried free-form metadata.
    pub has_metadata: bool,

    /// The content's creation timestamp, if known.
    pub created_at: Option<DateTime<Utc>>,

    /// The content's source location, if known.
    pub source: Option<String>,
}

impl TaskMetadata {
    /// Extract the pipeline bookkeeping fields from a content record.
    pub fn from_record(record: &ContentRecord) -> Self {
        Self {
            content_id: record.id.clone(),
            title: record.title.clone(),
            kind: record.kind(),
            word_count: record.word_count(),
            has_excerpt: record.excerpt.is_some(),
            has_metadata: !record.metadata.is_empty(),
            created_at: record.created_at,
            source: record.source.clone(),
        }
    }
}

/// The standardized value every plugin task returns.
///
/// Invariant: `success == false` implies `error` is non-empty and `data` is
/// absent; `success == true` implies `error` is absent. Use [`TaskResult::ok`]
/// and [`TaskResult::failed`] to keep the invariant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskResult {
    /// Name of the task that produced this result.
    pub task_name: String,

    /// Whether the task succeeded.
    pub success: bool,

    /// Task output payload; present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Human-readable error; present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Failure category; present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,

    /// Whether the failure may be retried. Timeouts always are; execution
    /// errors only when the task tagged them so.
    #[serde(default)]
    pub retryable: bool,

    /// Content bookkeeping, always present regardless of success.
    pub metadata: TaskMetadata,

    /// When this result was created.
    pub created_at: DateTime<Utc>,
}

impl TaskResult {
    /// A successful result carrying `data`.
    pub fn ok(task_name: impl Into<String>, data: Value, metadata: TaskMetadata) -> Self {
        Self {
            task_name: task_name.into(),
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            retryable: false,
            metadata,
            created_at: Utc::now(),
        }
    }

    /// A failed result carrying an error message and code.
    pub fn failed(
        task_name: impl Into<String>,
        error: impl Into<String>,
        code: ErrorCode,
        retryable: bool,
        metadata: TaskMetadata,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            success: false,
            data: None,
            error: Some(error.into()),
            error_code: Some(code),
            retryable: retryable || code == ErrorCode::Timeout,
            metadata,
            created_at: Utc::now(),
        }
    }
}
