//! In-memory vocabulary index with exact and fuzzy key lookup.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use futures::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::{
    digits_agree, lookup_key, similarity, Candidate, KnowledgeSource, LookupError, Query,
    MIN_FUZZY_KEY_LEN,
};

const DEFAULT_RANK: u32 = 1;

/// A curated concept with its preferred name and synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default = "default_rank")]
    pub rank: u32,
}

fn default_rank() -> u32 {
    DEFAULT_RANK
}

impl Concept {
    pub fn new(id: &str, name: &str, synonyms: &[&str], rank: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            rank,
        }
    }

    /// Preferred name followed by synonyms.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }

    /// Vocabulary prefix of the identifier (`"MESH"` for `"MESH:D006973"`).
    fn prefix(&self) -> Option<&str> {
        self.id.split_once(':').map(|(prefix, _)| prefix)
    }
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("reading vocabulary {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("vocabulary {} row {row}: {reason}", path.display())]
    InvalidRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct ConceptRow {
    id: String,
    name: String,
    #[serde(default)]
    synonyms: String,
    #[serde(default)]
    rank: Option<u32>,
}

/// Read-only concept index.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    name: String,
    concepts: Vec<Concept>,
    exact: HashMap<String, Vec<usize>>,
    keys: Vec<(String, usize)>,
}

impl Vocabulary {
    pub fn new<I>(name: &str, concepts: I) -> Self
    where
        I: IntoIterator<Item = Concept>,
    {
        let mut vocabulary = Self {
            name: name.to_string(),
            concepts: Vec::new(),
            exact: HashMap::new(),
            keys: Vec::new(),
        };
        vocabulary.extend(concepts);
        vocabulary
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Every surface form known to the vocabulary, for gazetteer compilation.
    pub fn surface_terms(&self) -> impl Iterator<Item = &str> {
        self.concepts.iter().flat_map(Concept::terms)
    }

    /// Add concepts; synonyms of an already known id are merged into it.
    pub fn extend<I>(&mut self, concepts: I)
    where
        I: IntoIterator<Item = Concept>,
    {
        for concept in concepts {
            match self.concepts.iter_mut().find(|c| c.id == concept.id) {
                Some(existing) => {
                    for synonym in concept.terms() {
                        if !existing.terms().any(|t| t == synonym) {
                            existing.synonyms.push(synonym.to_string());
                        }
                    }
                    existing.rank = existing.rank.min(concept.rank);
                }
                None => self.concepts.push(concept),
            }
        }
        self.reindex();
    }

    /// Extend with the rows of a CSV file (`id,name,synonyms,rank`).
    pub fn extend_from_csv(&mut self, path: &Path) -> Result<usize, VocabularyError> {
        let concepts = load_csv(path)?;
        let count = concepts.len();
        self.extend(concepts);
        info!(vocabulary = %self.name, path = %path.display(), rows = count, "extended vocabulary");
        Ok(count)
    }

    /// Candidates for a lookup key: all exact hits, otherwise fuzzy hits at or
    /// above `threshold` (best score per concept) among keys with the same
    /// digits.
    pub fn candidates(&self, key: &str, threshold: f64) -> Vec<Candidate> {
        if key.is_empty() {
            return Vec::new();
        }
        if let Some(hits) = self.exact.get(key) {
            return hits.iter().map(|&idx| self.candidate(idx, 1.0)).collect();
        }
        if key.chars().count() < MIN_FUZZY_KEY_LEN {
            return Vec::new();
        }

        let mut best: BTreeMap<usize, f64> = BTreeMap::new();
        for (term_key, idx) in &self.keys {
            if !digits_agree(key, term_key) {
                continue;
            }
            let score = similarity(key, term_key);
            if score < threshold {
                continue;
            }
            let slot = best.entry(*idx).or_insert(score);
            if score > *slot {
                *slot = score;
            }
        }
        best.into_iter()
            .map(|(idx, score)| self.candidate(idx, score))
            .collect()
    }

    fn candidate(&self, idx: usize, similarity: f64) -> Candidate {
        let concept = &self.concepts[idx];
        Candidate {
            id: concept.id.clone(),
            name: concept.name.clone(),
            source: concept.prefix().unwrap_or(&self.name).to_string(),
            similarity,
            rank: concept.rank,
        }
    }

    fn reindex(&mut self) {
        self.exact.clear();
        self.keys.clear();
        for (idx, concept) in self.concepts.iter().enumerate() {
            for term in concept.terms() {
                let key = lookup_key(term);
                if key.is_empty() {
                    continue;
                }
                let hits = self.exact.entry(key.clone()).or_default();
                if !hits.contains(&idx) {
                    hits.push(idx);
                    self.keys.push((key, idx));
                }
            }
        }
    }
}

impl KnowledgeSource for Vocabulary {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup<'a>(&'a self, query: Query<'a>) -> BoxFuture<'a, Result<Vec<Candidate>, LookupError>> {
        future::ready(Ok(self.candidates(query.key, query.threshold))).boxed()
    }
}

/// Parse a vocabulary CSV; synonyms are `|`-separated and rank defaults to 1.
pub fn load_csv(path: &Path) -> Result<Vec<Concept>, VocabularyError> {
    let csv_err = |source: csv::Error| VocabularyError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut concepts = Vec::new();
    for (row_idx, result) in reader.deserialize::<ConceptRow>().enumerate() {
        let row = result.map_err(csv_err)?;
        if row.id.is_empty() || row.name.is_empty() {
            return Err(VocabularyError::InvalidRow {
                path: path.to_path_buf(),
                row: row_idx + 1,
                reason: "id and name are required".into(),
            });
        }
        let synonyms = row
            .synonyms
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        concepts.push(Concept {
            id: row.id,
            name: row.name,
            synonyms,
            rank: row.rank.unwrap_or(DEFAULT_RANK),
        });
    }
    Ok(concepts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(
            "MESH",
            vec![
                Concept::new("MESH:D006973", "Hypertension", &["high blood pressure"], 1),
                Concept::new("MESH:D003920", "Diabetes Mellitus", &["diabetes"], 1),
            ],
        )
    }

    #[test]
    fn exact_hit_scores_one() {
        let hits = vocab().candidates("highbloodpressure", 0.88);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "MESH:D006973");
        assert_eq!(hits[0].similarity, 1.0);
        assert_eq!(hits[0].source, "MESH");
    }

    #[test]
    fn fuzzy_hit_for_misspelling() {
        let hits = vocab().candidates("hypertention", 0.88);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].similarity < 1.0);
    }

    #[test]
    fn differing_digits_never_match_fuzzily() {
        let genes = Vocabulary::new("HGNC", vec![Concept::new("HGNC:1100", "BRCA1", &[], 1)]);
        assert!(genes.candidates("brca3", 0.88).is_empty());
        assert_eq!(genes.candidates("brca1", 0.88)[0].id, "HGNC:1100");
    }

    #[test]
    fn short_keys_skip_fuzzy() {
        assert!(vocab().candidates("dia", 0.5).is_empty());
    }

    #[test]
    fn extend_merges_synonyms() {
        let mut v = vocab();
        v.extend([Concept::new("MESH:D006973", "Hypertension", &["HTN"], 2)]);
        assert_eq!(v.len(), 2);
        assert_eq!(v.candidates("htn", 0.88)[0].rank, 1);
    }
}
