//! Normalization of loosely-typed content input.
//!
//! External producers hand over dictionary-like records (JSON objects,
//! markdown front matter). [`normalize_record`] turns an equivalent loose
//! representation into the canonical [`ContentRecord`] shape, sniffing the
//! subtype from the fields present when no `kind` tag is given.

use ck_protocol::content_models::ContentRecord;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the content boundary.
#[derive(Error, Debug)]
pub enum ContentError {
    /// The input cannot be normalized into a content record.
    #[error("Cannot normalize content input: {0}")]
    Normalize(String),

    /// Failed to read a content file from disk.
    #[error("Failed to read content file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse a content file.
    #[error("Failed to parse content file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The file extension maps to no known record format.
    #[error("Unsupported content file extension: {path}")]
    UnsupportedExtension { path: PathBuf },

    /// Failed to walk a content directory.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Field aliases accepted from loosely-typed producers.
const FIELD_ALIASES: &[(&str, &str)] = &[
    ("content", "body"),
    ("snippet", "excerpt"),
    ("source_url", "source"),
];

/// Normalize a loose JSON object into a canonical [`ContentRecord`].
///
/// Subtype sniffing when no `kind` tag is present:
/// - `speakers` or `transcript_type` => transcript
/// - `version` or `changes` => release notes
/// - anything else => blog post
///
/// A missing or empty `id` cannot be normalized and is an error.
pub fn normalize_record(value: Value) -> Result<ContentRecord, ContentError> {
    let mut object = match value {
        Value::Object(map) => map,
        other => {
            return Err(ContentError::Normalize(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    for (alias, canonical) in FIELD_ALIASES {
        if !object.contains_key(*canonical) {
            if let Some(value) = object.remove(*alias) {
                object.insert((*canonical).to_string(), value);
            }
        }
    }

    let id_present = object
        .get("id")
        .and_then(Value::as_str)
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);
    if !id_present {
        return Err(ContentError::Normalize(
            "missing required field: id".to_string(),
        ));
    }

    if !object.contains_key("kind") {
        let kind = if object.contains_key("speakers") || object.contains_key("transcript_type") {
            "transcript"
        } else if object.contains_key("version") || object.contains_key("changes") {
            "release_notes"
        } else {
            "blog_post"
        };
        object.insert("kind".to_string(), Value::String(kind.to_string()));
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| ContentError::Normalize(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_protocol::content_models::{ContentKind, ContentPayload};
    use serde_json::json;

    #[test]
    fn test_sniffs_transcript_from_speakers() {
        let record = normalize_record(json!({
            "id": "t-1",
            "title": "Episode 1",
            "content": "hello everyone",
            "speakers": ["Ada", "Grace"],
        }))
        .unwrap();

        assert_eq!(record.kind(), ContentKind::Transcript);
        // "content" alias maps onto body
        assert_eq!(record.body.as_deref(), Some("hello everyone"));
        match record.payload {
            ContentPayload::Transcript { speakers, .. } => assert_eq!(speakers.len(), 2),
            other => panic!("expected transcript, got {:?}", other),
        }
    }

    #[test]
    fn test_sniffs_release_notes_from_version() {
        let record = normalize_record(json!({
            "id": "rel-1",
            "title": "v2.0",
            "version": "2.0.0",
            "changes": ["faster pipelines"],
        }))
        .unwrap();

        assert_eq!(record.kind(), ContentKind::ReleaseNotes);
    }

    #[test]
    fn test_defaults_to_blog_post() {
        let record = normalize_record(json!({
            "id": "post-1",
            "title": "Hello",
            "snippet": "preview",
            "author": "Dana",
        }))
        .unwrap();

        assert_eq!(record.kind(), ContentKind::BlogPost);
        assert_eq!(record.excerpt.as_deref(), Some("preview"));
    }

    #[test]
    fn test_explicit_kind_wins_over_sniffing() {
        let record = normalize_record(json!({
            "id": "x-1",
            "kind": "blog_post",
            "title": "Not a transcript",
        }))
        .unwrap();

        assert_eq!(record.kind(), ContentKind::BlogPost);
    }

    #[test]
    fn test_missing_id_cannot_be_normalized() {
        let err = normalize_record(json!({"title": "no id"})).unwrap_err();
        assert!(matches!(err, ContentError::Normalize(msg) if msg.contains("id")));

        let err = normalize_record(json!({"id": "   ", "title": "blank id"})).unwrap_err();
        assert!(matches!(err, ContentError::Normalize(_)));
    }

    #[test]
    fn test_non_object_cannot_be_normalized() {
        let err = normalize_record(json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, ContentError::Normalize(msg) if msg.contains("array")));
    }

    #[test]
    fn test_release_notes_sniffed_without_version_fails() {
        // "changes" selects release_notes, whose payload requires version
        let err = normalize_record(json!({
            "id": "rel-2",
            "title": "v?",
            "changes": ["something"],
        }))
        .unwrap_err();
        assert!(matches!(err, ContentError::Normalize(_)));
    }
}
