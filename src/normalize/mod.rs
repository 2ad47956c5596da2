//! Vocabulary normalisation of recognised mentions.
//!
//! Every mention is reduced to a lookup key and offered to an ordered list of
//! [`KnowledgeSource`]s. The first exact key match wins outright; otherwise
//! fuzzy candidates from all sources above the similarity threshold compete on
//! similarity, then curation rank, then canonical identifier.

pub mod seeds;
pub mod service;
pub mod sources;
pub mod vocabulary;

use std::{cmp::Ordering, fmt, time::Duration};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use thiserror::Error;

pub use service::NormalizationService;
pub use sources::{PangoPatternSource, RxNavSource};
pub use vocabulary::{Concept, Vocabulary, VocabularyError};

/// Fuzzy candidates scoring below this are rejected.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.88;

/// Keys shorter than this only ever match exactly.
pub const MIN_FUZZY_KEY_LEN: usize = 4;

/// Semantic category served by one normalisation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Disease,
    Chemical,
    Genetic,
    Covid,
}

impl Category {
    pub const ALL: [Category; 4] = [Self::Disease, Self::Chemical, Self::Genetic, Self::Covid];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disease => "disease",
            Self::Chemical => "chemical",
            Self::Genetic => "genetic",
            Self::Covid => "covid",
        }
    }

    /// File name of the optional vocabulary extension.
    pub fn vocab_file(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of normalising one surface string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub surface_text: String,
    pub canonical_id: Option<String>,
    pub canonical_name: Option<String>,
    pub source_vocabulary: String,
    pub match_confidence: Option<f64>,
}

impl NormalizedEntity {
    /// A mention no source could resolve.
    pub fn unresolved(surface: &str, vocabulary: &str) -> Self {
        Self {
            surface_text: surface.to_string(),
            canonical_id: None,
            canonical_name: None,
            source_vocabulary: vocabulary.to_string(),
            match_confidence: None,
        }
    }

    pub fn resolved(surface: &str, candidate: Candidate) -> Self {
        Self {
            surface_text: surface.to_string(),
            canonical_id: Some(candidate.id),
            canonical_name: Some(candidate.name),
            source_vocabulary: candidate.source,
            match_confidence: Some((candidate.similarity * 10_000.0).round() / 10_000.0),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.canonical_id.is_some()
    }
}

/// Per-request aggregate returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub diseases: Vec<NormalizedEntity>,
    pub chemicals: Vec<NormalizedEntity>,
    pub genetics: Vec<NormalizedEntity>,
    pub covid: Vec<NormalizedEntity>,
}

/// A lookup request handed to knowledge sources.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub surface: &'a str,
    pub key: &'a str,
    pub threshold: f64,
}

/// A concept proposed by a knowledge source for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub source: String,
    pub similarity: f64,
    /// Curation rank, 1 being the most authoritative.
    pub rank: u32,
}

impl Candidate {
    /// Whether the candidate matched the lookup key itself.
    pub fn is_exact(&self) -> bool {
        self.similarity >= 1.0
    }
}

/// Failure of a single lookup. Never fatal for a request.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// An authority able to propose canonical concepts for a lookup key.
pub trait KnowledgeSource: Send + Sync {
    /// Name reported for diagnostics.
    fn name(&self) -> &str;

    fn lookup<'a>(&'a self, query: Query<'a>) -> BoxFuture<'a, Result<Vec<Candidate>, LookupError>>;
}

/// Case-fold and keep alphanumerics only: `"COVID-19"` becomes `"covid19"`.
pub fn lookup_key(surface: &str) -> String {
    surface
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity between two lookup keys in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b)
}

/// Digit runs identify lineages, gene family members and doses, so two keys are
/// only fuzzy-comparable when their digits are identical.
pub fn digits_agree(a: &str, b: &str) -> bool {
    a.chars()
        .filter(char::is_ascii_digit)
        .eq(b.chars().filter(char::is_ascii_digit))
}

/// Deterministic candidate ordering: similarity desc, rank asc, id asc.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.rank.cmp(&b.rank))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the winning candidate at or above `threshold`, if any.
pub fn select_best(candidates: Vec<Candidate>, threshold: f64) -> Option<Candidate> {
    candidates
        .into_iter()
        .filter(|c| c.similarity >= threshold)
        .min_by(compare_candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, similarity: f64, rank: u32) -> Candidate {
        Candidate {
            id: id.into(),
            name: id.into(),
            source: "TEST".into(),
            similarity,
            rank,
        }
    }

    #[test]
    fn key_strips_punctuation_and_case() {
        assert_eq!(lookup_key("COVID-19"), "covid19");
        assert_eq!(lookup_key("  Alzheimer's disease "), "alzheimersdisease");
        assert_eq!(lookup_key("--"), "");
    }

    #[test]
    fn rank_breaks_similarity_ties() {
        let best = select_best(
            vec![candidate("B:2", 0.9, 3), candidate("A:1", 0.9, 1)],
            0.88,
        )
        .unwrap();
        assert_eq!(best.id, "A:1");
    }

    #[test]
    fn id_breaks_full_ties() {
        let best = select_best(
            vec![candidate("Z:9", 0.95, 1), candidate("C:3", 0.95, 1)],
            0.88,
        )
        .unwrap();
        assert_eq!(best.id, "C:3");
    }

    #[test]
    fn digits_must_agree_for_fuzzy_comparison() {
        assert!(digits_agree("dexamethazone", "dexamethasone"));
        assert!(digits_agree("covid19", "covid 19"));
        assert!(!digits_agree("brca3", "brca1"));
        assert!(!digits_agree("b118", "b117"));
    }

    #[test]
    fn below_threshold_is_rejected() {
        assert!(select_best(vec![candidate("A:1", 0.87, 1)], 0.88).is_none());
        assert!(select_best(Vec::new(), 0.88).is_none());
    }
}
