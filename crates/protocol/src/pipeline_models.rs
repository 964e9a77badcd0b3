//! Pipeline definition models for `.content-kit/` configuration files.
//!
//! A pipeline definition is authored declaratively across three kinds of
//! files and loaded once at startup:
//!
//! - `pipelines/*.yaml`: one named pipeline per file, an ordered step list
//! - `flow.yaml`: the context-passing table (step name -> data-flow rule)
//! - `branching.yaml`: sub-pipeline step lists and the subtype branching table

use crate::content_models::ContentKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named pipeline: an ordered list of step names.
///
/// # Example
///
/// ```yaml
/// name: content-analysis
/// steps:
///   - analyze_content
///   - extract_keywords
///   - keyword_placement
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineSpec {
    /// Unique name identifying this pipeline.
    pub name: String,

    /// Sequential list of step names to execute.
    pub steps: Vec<String>,
}

/// Data-flow rule for a single step.
///
/// A step only knows the names of the context keys it reads and writes, never
/// the identity of the step that produced them, so pipelines can be reordered
/// without code changes to the steps themselves.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ContextRule {
    /// Context key this step consumes as input, if any.
    #[serde(default)]
    pub input_key: Option<String>,

    /// Context key this step's output data is stored under.
    ///
    /// Defaults to the step name when absent.
    #[serde(default)]
    pub output_key: Option<String>,

    /// Whether a missing input key is an input-resolution failure.
    ///
    /// Optional inputs resolve to nothing when the key is absent.
    #[serde(default)]
    pub required: bool,
}

impl ContextRule {
    /// The effective output key for a step governed by this rule.
    pub fn output_key_for<'a>(&'a self, step: &'a str) -> &'a str {
        self.output_key.as_deref().unwrap_or(step)
    }
}

/// Contents of `flow.yaml`: the context-passing table.
///
/// Steps without an entry get the default rule (no input, output key equal
/// to the step name, not required).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FlowTable {
    #[serde(default)]
    pub context: HashMap<String, ContextRule>,
}

/// Selector key in a branching table: an exact content subtype, or the
/// reserved `other` fallback.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeSelector {
    BlogPost,
    Transcript,
    ReleaseNotes,
    /// Fallback entry used when no exact subtype match exists.
    Other,
}

impl From<ContentKind> for SubtypeSelector {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::BlogPost => SubtypeSelector::BlogPost,
            ContentKind::Transcript => SubtypeSelector::Transcript,
            ContentKind::ReleaseNotes => SubtypeSelector::ReleaseNotes,
        }
    }
}

/// Contents of `branching.yaml`: sub-pipeline definitions and the branching
/// table mapping (step, subtype) to a sub-pipeline name.
///
/// # Example
///
/// ```yaml
/// sub-pipelines:
///   analyze-blog-post:
///     - detect_type
///     - extract_metadata
///     - validate_structure
/// branching:
///   analyze_content:
///     blog_post: analyze-blog-post
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BranchingTable {
    /// Named sub-pipelines: ordered lists of finer-grained step names.
    #[serde(default)]
    pub sub_pipelines: HashMap<String, Vec<String>>,

    /// Step name -> subtype selector -> sub-pipeline name.
    #[serde(default)]
    pub branching: HashMap<String, HashMap<SubtypeSelector, String>>,
}
