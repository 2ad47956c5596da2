//! Per-category normalisation service.

use std::{sync::Arc, time::Duration};

use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::{
    lookup_key, select_best, Candidate, Category, KnowledgeSource, LookupError, NormalizedEntity,
    Query, DEFAULT_MATCH_THRESHOLD,
};

/// Concurrent lookups in flight per request and category.
const LOOKUP_CONCURRENCY: usize = 4;

/// Maps the mentions of one category onto canonical concepts.
///
/// Sources are consulted in order. The first exact hit wins; otherwise fuzzy
/// candidates from every source compete together. A failing source is skipped
/// for that mention only.
#[derive(Clone)]
pub struct NormalizationService {
    category: Category,
    vocabulary: String,
    sources: Vec<Arc<dyn KnowledgeSource>>,
    threshold: f64,
    timeout: Duration,
}

impl std::fmt::Debug for NormalizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizationService")
            .field("category", &self.category)
            .field("vocabulary", &self.vocabulary)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl NormalizationService {
    pub fn new(category: Category, vocabulary: impl Into<String>) -> Self {
        Self {
            category,
            vocabulary: vocabulary.into(),
            sources: Vec::new(),
            threshold: DEFAULT_MATCH_THRESHOLD,
            timeout: Duration::from_secs(3),
        }
    }

    pub fn with_source(mut self, source: Arc<dyn KnowledgeSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn vocabulary(&self) -> &str {
        &self.vocabulary
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Normalise every term, one output per input, in input order.
    #[instrument(skip_all, fields(category = %self.category, terms = terms.len()))]
    pub async fn normalize(&self, terms: &[String]) -> Vec<NormalizedEntity> {
        let pending: Vec<_> = terms.iter().map(|term| self.resolve(term)).collect();
        let entities: Vec<NormalizedEntity> = stream::iter(pending)
            .buffered(LOOKUP_CONCURRENCY)
            .collect()
            .await;
        let resolved = entities.iter().filter(|e| e.is_resolved()).count();
        debug!(resolved, "normalised mentions");
        entities
    }

    /// Resolve a single surface string; never fails.
    pub async fn resolve(&self, surface: &str) -> NormalizedEntity {
        let key = lookup_key(surface);
        if key.is_empty() {
            return NormalizedEntity::unresolved(surface, &self.vocabulary);
        }
        let query = Query {
            surface,
            key: &key,
            threshold: self.threshold,
        };

        let mut fuzzy: Vec<Candidate> = Vec::new();
        for source in &self.sources {
            let outcome = match timeout(self.timeout, source.lookup(query)).await {
                Ok(result) => result,
                Err(_) => Err(LookupError::Timeout(self.timeout)),
            };
            match outcome {
                Ok(candidates) => {
                    let (exact, rest): (Vec<_>, Vec<_>) =
                        candidates.into_iter().partition(Candidate::is_exact);
                    if let Some(best) = select_best(exact, self.threshold) {
                        return NormalizedEntity::resolved(surface, best);
                    }
                    fuzzy.extend(rest);
                }
                Err(err) => {
                    warn!(
                        category = %self.category,
                        source = source.name(),
                        term = surface,
                        error = %err,
                        "lookup failed; trying next source"
                    );
                }
            }
        }
        if let Some(best) = select_best(fuzzy, self.threshold) {
            return NormalizedEntity::resolved(surface, best);
        }
        NormalizedEntity::unresolved(surface, &self.vocabulary)
    }
}
