//! Branching router.
//!
//! Decides whether a step expands into a named sub-pipeline for a content
//! subtype. Selection is a two-level lookup: first by step name, then by
//! subtype, falling back to the reserved `other` entry. Expansion is purely
//! structural: it inspects the declared subtype tag, never the content's
//! field values.

use crate::config::models::PipelineDefinition;
use ck_protocol::content_models::ContentKind;
use ck_protocol::pipeline_models::SubtypeSelector;
use std::sync::Arc;

/// Resolves sub-pipeline expansions from the branching tables.
pub struct BranchingRouter {
    definition: Arc<PipelineDefinition>,
}

impl BranchingRouter {
    pub fn new(definition: Arc<PipelineDefinition>) -> Self {
        Self { definition }
    }

    /// The ordered sub-steps a step expands into for the given subtype, or
    /// `None` when the step executes directly as a leaf task.
    pub fn expand(&self, step: &str, kind: ContentKind) -> Option<&[String]> {
        let targets = self.definition.branching.get(step)?;
        let name = targets
            .get(&SubtypeSelector::from(kind))
            .or_else(|| targets.get(&SubtypeSelector::Other))?;
        self.definition
            .sub_pipelines
            .get(name)
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_protocol::pipeline_models::{BranchingTable, FlowTable, PipelineSpec};

    fn router(branching_yaml: &str) -> BranchingRouter {
        let branching: BranchingTable = serde_yaml::from_str(branching_yaml).unwrap();
        let definition = PipelineDefinition::assemble(
            vec![PipelineSpec {
                name: "main".to_string(),
                steps: vec!["analyze_content".to_string()],
            }],
            FlowTable::default(),
            branching,
        );
        BranchingRouter::new(Arc::new(definition))
    }

    #[test]
    fn test_exact_subtype_match() {
        let router = router(
            r#"
sub-pipelines:
  analyze-blog-post:
    - detect_type
    - extract_metadata
    - validate_structure
branching:
  analyze_content:
    blog_post: analyze-blog-post
"#,
        );

        let steps = router
            .expand("analyze_content", ContentKind::BlogPost)
            .expect("blog posts should expand");
        assert_eq!(steps, ["detect_type", "extract_metadata", "validate_structure"]);
    }

    #[test]
    fn test_other_fallback() {
        let router = router(
            r#"
sub-pipelines:
  analyze-blog-post:
    - detect_type
  analyze-generic:
    - extract_metadata
branching:
  analyze_content:
    blog_post: analyze-blog-post
    other: analyze-generic
"#,
        );

        let steps = router
            .expand("analyze_content", ContentKind::Transcript)
            .expect("other entry should apply");
        assert_eq!(steps, ["extract_metadata"]);
    }

    #[test]
    fn test_no_entry_and_no_fallback_returns_none() {
        let router = router(
            r#"
sub-pipelines:
  analyze-blog-post:
    - detect_type
branching:
  analyze_content:
    blog_post: analyze-blog-post
"#,
        );

        assert!(router
            .expand("analyze_content", ContentKind::ReleaseNotes)
            .is_none());
    }

    #[test]
    fn test_unlisted_step_returns_none() {
        let router = router("branching: {}");
        assert!(router.expand("extract_keywords", ContentKind::BlogPost).is_none());
    }
}
