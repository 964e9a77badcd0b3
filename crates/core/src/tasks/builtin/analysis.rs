//! Structural content-analysis tasks.
//!
//! These are the pure analysis steps used by the default pipelines and by
//! the blog-post sub-pipeline: subtype detection, metadata extraction, and
//! structural validation.

use crate::tasks::base::{PluginTask, TaskError};
use crate::tasks::util::validate_for_processing;
use async_trait::async_trait;
use ck_protocol::content_models::{ContentPayload, ContentRecord};
use ck_protocol::task_models::TaskMetadata;
use serde_json::{json, Map, Value};

/// Words per minute assumed for reading-time estimates.
const READING_WPM: usize = 200;

fn heading_count(body: &str) -> usize {
    body.lines()
        .filter(|l| l.trim_start().starts_with('#'))
        .count()
}

fn paragraph_count(body: &str) -> usize {
    body.split("\n\n").filter(|p| !p.trim().is_empty()).count()
}

/// Fraction of the optional base fields that are populated.
fn completeness(record: &ContentRecord) -> f64 {
    let present = [
        record.title.is_some(),
        record.body.is_some(),
        record.excerpt.is_some(),
        !record.metadata.is_empty(),
        record.created_at.is_some(),
        record.source.is_some(),
    ]
    .iter()
    .filter(|p| **p)
    .count();
    present as f64 / 6.0
}

/// Top-level content analysis: subtype, size, structure, completeness.
pub struct AnalyzeContentTask;

#[async_trait]
impl PluginTask for AnalyzeContentTask {
    fn name(&self) -> &str {
        "analyze_content"
    }

    async fn execute(
        &self,
        content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let body = content.body.as_deref().unwrap_or("");
        let word_count = content.word_count();
        let check = validate_for_processing(content);

        Ok(json!({
            "content_type": content.kind().as_str(),
            "word_count": word_count,
            "reading_time_mins": word_count.div_ceil(READING_WPM),
            "completeness": completeness(content),
            "is_ready": check.is_valid(),
            "warnings": check.warnings,
            "structure": {
                "has_title": content.title.is_some(),
                "has_body": content.body.is_some(),
                "has_excerpt": content.excerpt.is_some(),
                "heading_count": heading_count(body),
                "paragraph_count": paragraph_count(body),
            },
        }))
    }
}

/// Detect the content subtype and suggest a processing route for it.
pub struct DetectTypeTask;

#[async_trait]
impl PluginTask for DetectTypeTask {
    fn name(&self) -> &str {
        "detect_type"
    }

    async fn execute(
        &self,
        content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let kind = content.kind();
        let detail = match &content.payload {
            ContentPayload::BlogPost { author, tags, category } => json!({
                "author": author,
                "category": category,
                "tag_count": tags.len(),
            }),
            ContentPayload::Transcript { speakers, duration, transcript_type } => json!({
                "speaker_count": speakers.len(),
                "duration": duration,
                "transcript_type": transcript_type,
            }),
            ContentPayload::ReleaseNotes { version, changes, .. } => json!({
                "version": version,
                "change_count": changes.len(),
            }),
        };

        Ok(json!({
            "content_type": kind.as_str(),
            "suggested_route": format!("analyze-{}", kind.as_str().replace('_', "-")),
            "detail": detail,
        }))
    }
}

/// Extract the pipeline bookkeeping metadata plus subtype-specific fields.
pub struct ExtractMetadataTask;

#[async_trait]
impl PluginTask for ExtractMetadataTask {
    fn name(&self) -> &str {
        "extract_metadata"
    }

    async fn execute(
        &self,
        content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let common = serde_json::to_value(TaskMetadata::from_record(content))
            .map_err(|e| TaskError::execution(format!("metadata serialization failed: {}", e)))?;

        let mut object = match common {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        match &content.payload {
            ContentPayload::BlogPost { author, tags, category } => {
                object.insert("author".to_string(), json!(author));
                object.insert("tags".to_string(), json!(tags));
                object.insert("category".to_string(), json!(category));
            }
            ContentPayload::Transcript { speakers, duration, transcript_type } => {
                object.insert("speakers".to_string(), json!(speakers));
                object.insert("duration".to_string(), json!(duration));
                object.insert("transcript_type".to_string(), json!(transcript_type));
            }
            ContentPayload::ReleaseNotes {
                version,
                changes,
                breaking_changes,
                features,
                bug_fixes,
            } => {
                object.insert("version".to_string(), json!(version));
                object.insert("changes_count".to_string(), json!(changes.len()));
                object.insert(
                    "breaking_changes_count".to_string(),
                    json!(breaking_changes.len()),
                );
                object.insert("features_count".to_string(), json!(features.len()));
                object.insert("bug_fixes_count".to_string(), json!(bug_fixes.len()));
            }
        }

        Ok(Value::Object(object))
    }
}

/// Report the structural validation findings for a record.
pub struct ValidateStructureTask;

#[async_trait]
impl PluginTask for ValidateStructureTask {
    fn name(&self) -> &str {
        "validate_structure"
    }

    async fn execute(
        &self,
        content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let check = validate_for_processing(content);
        Ok(json!({
            "is_valid": check.is_valid(),
            "issues": check.issues,
            "warnings": check.warnings,
        }))
    }
}
