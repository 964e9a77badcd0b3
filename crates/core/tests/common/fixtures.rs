//! Test fixtures for creating sample records and definitions.

use ck_core::config::models::PipelineDefinition;
use ck_core::engine::Sequencer;
use ck_core::tasks::registry::TaskRegistry;
use ck_protocol::config_models::EngineSettings;
use ck_protocol::content_models::{ContentPayload, ContentRecord};
use ck_protocol::pipeline_models::{BranchingTable, FlowTable, PipelineSpec};
use std::sync::Arc;

/// A blog-post record with enough text for keyword extraction.
pub fn blog_record(id: &str) -> ContentRecord {
    let mut record = ContentRecord::new(
        id,
        ContentPayload::BlogPost {
            author: Some("Dana".to_string()),
            tags: vec!["automation".to_string()],
            category: None,
        },
    );
    record.title = Some("Content pipeline automation".to_string());
    record.body = Some(
        "# Why automation\n\nContent pipeline automation keeps editorial work moving. \
         A content pipeline turns raw transcripts and drafts into publishable articles.\n\n\
         Strategy matters, but automation wins on volume."
            .to_string(),
    );
    record
}

/// A transcript record.
#[allow(dead_code)]
pub fn transcript_record(id: &str) -> ContentRecord {
    let mut record = ContentRecord::new(
        id,
        ContentPayload::Transcript {
            speakers: vec!["Ada".to_string(), "Grace".to_string()],
            duration: Some("42:00".to_string()),
            transcript_type: Some("podcast".to_string()),
        },
    );
    record.title = Some("Episode 12: pipelines".to_string());
    record.body = Some("Welcome back. Today we talk about content pipelines.".to_string());
    record
}

/// Build a definition from step lists plus optional flow/branching YAML.
pub fn definition(
    pipelines: &[(&str, &[&str])],
    flow_yaml: &str,
    branching_yaml: &str,
) -> Arc<PipelineDefinition> {
    let specs = pipelines
        .iter()
        .map(|(name, steps)| PipelineSpec {
            name: name.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    let flow: FlowTable = if flow_yaml.is_empty() {
        FlowTable::default()
    } else {
        serde_yaml::from_str(flow_yaml).expect("invalid flow fixture")
    };
    let branching: BranchingTable = if branching_yaml.is_empty() {
        BranchingTable::default()
    } else {
        serde_yaml::from_str(branching_yaml).expect("invalid branching fixture")
    };

    Arc::new(PipelineDefinition::assemble(specs, flow, branching))
}

/// Engine settings tuned for fast tests: tight timeout, quick backoff.
pub fn fast_settings(max_attempts: u32) -> EngineSettings {
    EngineSettings {
        step_timeout_secs: 5,
        max_attempts,
        backoff_ms: 1,
    }
}

/// A sequencer over the given definition and registry.
pub fn sequencer(
    definition: Arc<PipelineDefinition>,
    registry: TaskRegistry,
    settings: EngineSettings,
) -> Sequencer {
    Sequencer::new(definition, registry, settings)
}
