//! Scored keyword model produced by the relevance scoring engine.

use serde::{Deserialize, Serialize};

/// A keyword ranked by the relevance scoring engine.
///
/// Rank positions form a contiguous sequence starting at 1 and are strictly
/// increasing with non-increasing score; ties are broken by first occurrence
/// in the source text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScoredKeyword {
    /// The keyword text as supplied in the candidate set.
    pub keyword: String,

    /// Raw case-insensitive occurrence count in the source text.
    pub frequency: usize,

    /// Composite relevance score (weighted sum of the four signals).
    pub score: f64,

    /// 1-based rank position.
    pub rank: usize,
}
