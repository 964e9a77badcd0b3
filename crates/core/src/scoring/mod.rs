//! Keyword relevance scoring engine.
//!
//! A pure, deterministic ranking from (text, candidate keywords) to scored
//! keywords. Each candidate gets four signals, combined as a weighted sum
//! with weights that sum to 1.0:
//!
//! - frequency: raw case-insensitive occurrence count, normalized against
//!   the most frequent candidate
//! - position: inverse of the 0-based index of the first occurrence, so
//!   earlier mentions score higher
//! - length: a configured token-length band, rewarding multi-word phrases
//!   over single common words and penalizing very long phrases
//! - uniqueness: inverse document frequency against a reference corpus, or
//!   absent one, the inverse of the candidate's occurrence share

use ck_protocol::config_models::{LengthBand, ScoringSettings, ScoringWeights};
use ck_protocol::keyword_models::ScoredKeyword;
use std::collections::HashMap;

/// Stop words excluded from candidate extraction.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us",
    "them", "not", "from", "into", "about", "than", "then", "its", "their", "your", "our",
];

const MAX_UNIGRAM_CANDIDATES: usize = 50;
const MAX_BIGRAM_CANDIDATES: usize = 25;

/// Multi-factor keyword relevance scorer.
///
/// Construction validates nothing; weight validation happens at
/// configuration load. Scoring the same `(text, candidates)` pair twice with
/// identical settings yields identical output.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    settings: ScoringSettings,
    /// Optional reference corpus: keyword -> document frequency in `[0, 1]`.
    corpus_df: Option<HashMap<String, f64>>,
}

struct Candidate {
    keyword: String,
    count: usize,
    first_index: usize,
    tokens: usize,
}

impl KeywordScorer {
    pub fn new(settings: ScoringSettings) -> Self {
        Self {
            settings,
            corpus_df: None,
        }
    }

    /// Attach a reference corpus for the uniqueness signal. Keys are
    /// lowercase keywords, values document frequencies in `[0, 1]`.
    pub fn with_reference_corpus(mut self, corpus_df: HashMap<String, f64>) -> Self {
        self.corpus_df = Some(corpus_df);
        self
    }

    /// Default number of results configured for this scorer.
    pub fn default_max_results(&self) -> usize {
        self.settings.max_results
    }

    /// Score `candidates` against `text` and return at most `max_results`
    /// keywords, ranked from 1.
    ///
    /// Candidates absent from the text are excluded entirely; an empty text
    /// or candidate set (or `max_results == 0`) yields an empty result.
    pub fn score(&self, text: &str, candidates: &[String], max_results: usize) -> Vec<ScoredKeyword> {
        if text.trim().is_empty() || candidates.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let haystack = text.to_lowercase();

        // Collapse duplicate candidates, preserving first-seen order.
        let mut seen: Vec<String> = Vec::new();
        let mut found: Vec<Candidate> = Vec::new();
        for candidate in candidates {
            let needle = candidate.trim().to_lowercase();
            if needle.is_empty() || seen.contains(&needle) {
                continue;
            }
            seen.push(needle.clone());

            let mut matches = haystack.match_indices(&needle);
            let first_index = match matches.next() {
                Some((idx, _)) => idx,
                // Zero occurrences: excluded entirely, never ranked.
                None => continue,
            };
            let count = 1 + matches.count();

            found.push(Candidate {
                keyword: candidate.trim().to_string(),
                count,
                first_index,
                tokens: needle.split_whitespace().count(),
            });
        }

        if found.is_empty() {
            return Vec::new();
        }

        let max_count = found.iter().map(|c| c.count).max().unwrap_or(1) as f64;
        let total_count: usize = found.iter().map(|c| c.count).sum();

        let weights = &self.settings.weights;
        let mut scored: Vec<(Candidate, f64)> = found
            .into_iter()
            .map(|c| {
                let score = self.composite(&c, max_count, total_count, weights);
                (c, score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.first_index.cmp(&b.0.first_index))
        });
        scored.truncate(max_results);

        scored
            .into_iter()
            .enumerate()
            .map(|(i, (c, score))| ScoredKeyword {
                keyword: c.keyword,
                frequency: c.count,
                score,
                rank: i + 1,
            })
            .collect()
    }

    fn composite(
        &self,
        candidate: &Candidate,
        max_count: f64,
        total_count: usize,
        weights: &ScoringWeights,
    ) -> f64 {
        let frequency = candidate.count as f64 / max_count;
        let position = 1.0 / (1.0 + candidate.first_index as f64);
        let length = length_signal(candidate.tokens, &self.settings.length_band);
        let uniqueness = self.uniqueness_signal(candidate, total_count);

        weights.frequency * frequency
            + weights.position * position
            + weights.length * length
            + weights.uniqueness * uniqueness
    }

    fn uniqueness_signal(&self, candidate: &Candidate, total_count: usize) -> f64 {
        match &self.corpus_df {
            Some(corpus) => {
                let df = corpus
                    .get(&candidate.keyword.to_lowercase())
                    .copied()
                    .unwrap_or(0.0);
                (1.0 - df).clamp(0.0, 1.0)
            }
            None => {
                if total_count == 0 {
                    0.0
                } else {
                    1.0 - (candidate.count as f64 / total_count as f64)
                }
            }
        }
    }
}

/// Length signal: 1.0 inside the ideal band, 0.5 for shorter keywords,
/// decaying for longer phrases, 0.0 outside the hard bounds.
fn length_signal(tokens: usize, band: &LengthBand) -> f64 {
    if tokens < band.min_tokens || tokens > band.max_tokens {
        0.0
    } else if tokens >= band.ideal_min && tokens <= band.ideal_max {
        1.0
    } else if tokens < band.ideal_min {
        0.5
    } else {
        band.ideal_max as f64 / tokens as f64
    }
}

/// Extract candidate keywords from text: stop-word-filtered unigrams plus
/// bigrams of adjacent content words, in first-seen order.
pub fn extract_candidates(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let is_content_word = |t: &str| t.len() >= 3 && !STOP_WORDS.contains(&t);

    let mut unigrams: Vec<String> = Vec::new();
    for token in &tokens {
        if is_content_word(token) && !unigrams.iter().any(|u| u == token) {
            unigrams.push((*token).to_string());
            if unigrams.len() >= MAX_UNIGRAM_CANDIDATES {
                break;
            }
        }
    }

    let mut bigrams: Vec<String> = Vec::new();
    for pair in tokens.windows(2) {
        if is_content_word(pair[0]) && is_content_word(pair[1]) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            if !bigrams.contains(&bigram) {
                bigrams.push(bigram);
                if bigrams.len() >= MAX_BIGRAM_CANDIDATES {
                    break;
                }
            }
        }
    }

    unigrams.extend(bigrams);
    unigrams
}
