//! Keyword tasks: extraction/scoring and placement analysis.

use crate::scoring::{extract_candidates, KeywordScorer};
use crate::tasks::base::{PluginTask, TaskError};
use async_trait::async_trait;
use ck_protocol::content_models::ContentRecord;
use serde_json::{json, Map, Value};

/// Extract candidate keywords from the record text and rank them with the
/// relevance scoring engine.
pub struct ExtractKeywordsTask {
    scorer: KeywordScorer,
}

impl ExtractKeywordsTask {
    pub fn new(scorer: KeywordScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl PluginTask for ExtractKeywordsTask {
    fn name(&self) -> &str {
        "extract_keywords"
    }

    async fn execute(
        &self,
        content: &ContentRecord,
        _input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let text = content.full_text();
        let candidates = extract_candidates(&text);
        let keywords = self
            .scorer
            .score(&text, &candidates, self.scorer.default_max_results());

        Ok(json!({
            "keywords": keywords,
            "candidate_count": candidates.len(),
            "scored_count": keywords.len(),
        }))
    }
}

/// Analyze where previously scored keywords appear in the content and
/// recommend placement improvements.
///
/// Consumes the output of `extract_keywords` from the run context; the step
/// is decoupled from the producer and only knows the context key it reads.
pub struct KeywordPlacementTask;

/// Accepts either the `extract_keywords` payload (`{"keywords": [...]}`) or
/// a bare array; elements may be scored-keyword objects or plain strings.
fn keyword_strings(input: &Value) -> Vec<String> {
    let array = match input {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("keywords").and_then(Value::as_array) {
            Some(items) => items.as_slice(),
            None => &[],
        },
        _ => &[],
    };

    array
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map
                .get("keyword")
                .and_then(Value::as_str)
                .map(|s| s.to_string()),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl PluginTask for KeywordPlacementTask {
    fn name(&self) -> &str {
        "keyword_placement"
    }

    async fn execute(
        &self,
        content: &ContentRecord,
        input: Option<Value>,
    ) -> Result<Value, TaskError> {
        let input = input.ok_or_else(|| {
            TaskError::Validation(vec!["missing scored keywords input".to_string()])
        })?;
        let keywords = keyword_strings(&input);

        let title = content.title.as_deref().unwrap_or("").to_lowercase();
        let body = content.body.as_deref().unwrap_or("");
        let headings: Vec<String> = body
            .lines()
            .filter(|l| l.trim_start().starts_with('#'))
            .map(|l| l.to_lowercase())
            .collect();
        let first_100_words = body
            .split_whitespace()
            .take(100)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let mut placements = Map::new();
        let mut recommendations: Vec<String> = Vec::new();

        for keyword in &keywords {
            let needle = keyword.to_lowercase();
            let in_title = title.contains(&needle);
            let in_headings = headings.iter().any(|h| h.contains(&needle));
            let in_lead = first_100_words.contains(&needle);

            if !in_title {
                recommendations.push(format!("Consider adding '{}' to the title", keyword));
            }
            if !in_headings {
                recommendations.push(format!("Consider adding '{}' to a heading", keyword));
            }
            if !in_lead {
                recommendations.push(format!(
                    "Consider adding '{}' to the first paragraph",
                    keyword
                ));
            }

            placements.insert(
                keyword.clone(),
                json!({
                    "in_title": in_title,
                    "in_headings": in_headings,
                    "in_first_100_words": in_lead,
                }),
            );
        }

        Ok(json!({
            "analyzed_keywords": keywords.len(),
            "placements": placements,
            "recommendations": recommendations,
        }))
    }
}
