//! Built-in content tasks installed by [`TaskRegistry::builtin`].
//!
//! [`TaskRegistry::builtin`]: crate::tasks::registry::TaskRegistry::builtin

pub mod analysis;
pub mod keywords;

use crate::scoring::KeywordScorer;
use crate::tasks::registry::TaskRegistry;
use ck_protocol::config_models::ScoringSettings;

/// Register every built-in task, wiring the keyword tasks to the given
/// scoring settings.
pub fn register_all(registry: &mut TaskRegistry, scoring: ScoringSettings) {
    registry.register(analysis::AnalyzeContentTask);
    registry.register(analysis::DetectTypeTask);
    registry.register(analysis::ExtractMetadataTask);
    registry.register(analysis::ValidateStructureTask);
    registry.register(keywords::ExtractKeywordsTask::new(KeywordScorer::new(scoring)));
    registry.register(keywords::KeywordPlacementTask);
}
