//! Content record models.
//!
//! A [`ContentRecord`] is the unit of content traveling through a pipeline.
//! Records share a common base shape (identifier, title, body, excerpt,
//! metadata) and carry a tagged payload specific to their subtype, so the
//! router and data-flow manager can switch on the tag exhaustively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The unit of content processed by a pipeline run.
///
/// The identifier is non-empty and immutable for the life of the record; the
/// subtype payload is fixed at creation. Records are read-only to the engine.
///
/// # Example
///
/// ```json
/// {
///   "id": "post-42",
///   "kind": "blog_post",
///   "title": "Scaling content pipelines",
///   "body": "...",
///   "author": "Dana",
///   "tags": ["automation", "strategy"]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContentRecord {
    /// Unique identifier for the content item.
    pub id: String,

    /// Title of the content, if known.
    #[serde(default)]
    pub title: Option<String>,

    /// Full content text.
    #[serde(default)]
    pub body: Option<String>,

    /// Short excerpt or preview of the content.
    #[serde(default)]
    pub excerpt: Option<String>,

    /// Free-form metadata about the content.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// When the content was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Where the content came from (URL, path, ...).
    #[serde(default)]
    pub source: Option<String>,

    /// Subtype-specific fields, discriminated by the `kind` tag.
    #[serde(flatten)]
    pub payload: ContentPayload,
}

impl ContentRecord {
    /// Create a minimal record with the given identifier and payload.
    pub fn new(id: impl Into<String>, payload: ContentPayload) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: None,
            excerpt: None,
            metadata: HashMap::new(),
            created_at: None,
            source: None,
            payload,
        }
    }

    /// The record's subtype discriminator.
    pub fn kind(&self) -> ContentKind {
        self.payload.kind()
    }

    /// Whitespace-separated word count of the body.
    pub fn word_count(&self) -> usize {
        self.body
            .as_deref()
            .map(|b| b.split_whitespace().count())
            .unwrap_or(0)
    }

    /// Title and body joined into one searchable text.
    pub fn full_text(&self) -> String {
        match (self.title.as_deref(), self.body.as_deref()) {
            (Some(t), Some(b)) => format!("{} {}", t, b),
            (Some(t), None) => t.to_string(),
            (None, Some(b)) => b.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Subtype-specific payloads, discriminated by the `kind` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentPayload {
    /// A blog post or written article.
    BlogPost {
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        category: Option<String>,
    },

    /// A transcript of a podcast, video, or meeting.
    Transcript {
        #[serde(default)]
        speakers: Vec<String>,
        #[serde(default)]
        duration: Option<String>,
        /// podcast, video, meeting, interview, ...
        #[serde(default)]
        transcript_type: Option<String>,
    },

    /// Software release notes.
    ReleaseNotes {
        version: String,
        #[serde(default)]
        changes: Vec<String>,
        #[serde(default)]
        breaking_changes: Vec<String>,
        #[serde(default)]
        features: Vec<String>,
        #[serde(default)]
        bug_fixes: Vec<String>,
    },
}

impl ContentPayload {
    /// The discriminator for this payload.
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentPayload::BlogPost { .. } => ContentKind::BlogPost,
            ContentPayload::Transcript { .. } => ContentKind::Transcript,
            ContentPayload::ReleaseNotes { .. } => ContentKind::ReleaseNotes,
        }
    }
}

/// Plain discriminator for content subtypes.
///
/// Used wherever code needs to match on the subtype without touching the
/// payload fields, e.g. branching decisions and result metadata.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    BlogPost,
    Transcript,
    ReleaseNotes,
}

impl ContentKind {
    /// The serialized name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::BlogPost => "blog_post",
            ContentKind::Transcript => "transcript",
            ContentKind::ReleaseNotes => "release_notes",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
