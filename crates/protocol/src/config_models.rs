//! Global configuration models for `.content-kit/config.toml`.
//!
//! All fields are defaulted so a missing or partial config file yields a
//! working configuration.

use serde::{Deserialize, Serialize};

/// Settings from `.content-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// [engine]
/// step-timeout-secs = 120
/// max-attempts = 2
///
/// [scoring.weights]
/// frequency = 0.4
/// position = 0.3
/// length = 0.2
/// uniqueness = 0.1
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Sequencer execution settings.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Keyword relevance scoring settings.
    #[serde(default)]
    pub scoring: ScoringSettings,
}

/// Sequencer execution settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineSettings {
    /// Per-step deadline applied at the task boundary, in seconds.
    pub step_timeout_secs: u64,

    /// Total invocation attempts for retryable failures (timeouts and
    /// execution errors the task tagged retryable). Validation failures are
    /// never retried.
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts, in milliseconds.
    pub backoff_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            step_timeout_secs: 120,
            max_attempts: 2,
            backoff_ms: 200,
        }
    }
}

/// Keyword relevance scoring settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScoringSettings {
    /// Default maximum number of scored keywords returned by the
    /// keyword-extraction step.
    pub max_results: usize,

    /// Signal weights; must sum to 1.0.
    pub weights: ScoringWeights,

    /// Token-length band rewarded by the length signal.
    pub length_band: LengthBand,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            weights: ScoringWeights::default(),
            length_band: LengthBand::default(),
        }
    }
}

/// Weights of the four scoring signals. They must sum to 1.0, which the
/// configuration loader validates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScoringWeights {
    pub frequency: f64,
    pub position: f64,
    pub length: f64,
    pub uniqueness: f64,
}

impl ScoringWeights {
    /// Sum of all four weights.
    pub fn sum(&self) -> f64 {
        self.frequency + self.position + self.length + self.uniqueness
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            frequency: 0.4,
            position: 0.3,
            length: 0.2,
            uniqueness: 0.1,
        }
    }
}

/// Token-length band for the length signal.
///
/// Keywords whose token count falls in `ideal_min..=ideal_max` get the full
/// signal; shorter ones (single common words) and longer phrases are
/// penalized, and anything outside `min_tokens..=max_tokens` scores zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct LengthBand {
    pub min_tokens: usize,
    pub ideal_min: usize,
    pub ideal_max: usize,
    pub max_tokens: usize,
}

impl Default for LengthBand {
    fn default() -> Self {
        Self {
            min_tokens: 1,
            ideal_min: 2,
            ideal_max: 3,
            max_tokens: 5,
        }
    }
}
