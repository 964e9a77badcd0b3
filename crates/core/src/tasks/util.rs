//! Shared content checks used by the harness and the structural tasks.

use ck_protocol::content_models::ContentRecord;

/// Outcome of the structural validation pass run before any task work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCheck {
    /// Hard failures: the content is not processable.
    pub issues: Vec<String>,

    /// Soft findings worth surfacing but not blocking.
    pub warnings: Vec<String>,
}

impl ContentCheck {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate that a record is ready for processing.
///
/// Required: a non-empty identifier and at least one of title/body.
/// Everything else only produces warnings.
pub fn validate_for_processing(content: &ContentRecord) -> ContentCheck {
    let mut check = ContentCheck::default();

    if content.id.trim().is_empty() {
        check.issues.push("Missing or empty id".to_string());
    }

    let has_title = content
        .title
        .as_deref()
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false);
    let has_body = content
        .body
        .as_deref()
        .map(|b| !b.trim().is_empty())
        .unwrap_or(false);
    if !has_title && !has_body {
        check
            .issues
            .push("Missing both title and body".to_string());
    }

    if content
        .excerpt
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        check
            .warnings
            .push("Missing excerpt - consider adding one".to_string());
    }

    let word_count = content.word_count();
    if has_body && word_count < 100 {
        check
            .warnings
            .push("Content is very short (less than 100 words)".to_string());
    } else if word_count > 5000 {
        check
            .warnings
            .push("Content is very long (more than 5000 words)".to_string());
    }

    check
}
