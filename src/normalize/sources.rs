//! Knowledge sources beyond the local vocabularies.

use futures::future::{self, BoxFuture, FutureExt};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use urlencoding::encode;

use super::{lookup_key, similarity, Candidate, KnowledgeSource, LookupError, Query};

/// Pango lineage designations such as `B.1.1.7`, `BA.2.86` or `XBB.1.5`.
pub const PANGO_PATTERN: &str = r"^[A-Z]{1,3}(?:\.\d+){1,4}$";

static PANGO: Lazy<Regex> = Lazy::new(|| Regex::new(PANGO_PATTERN).expect("valid regex"));

const PANGO_RANK: u32 = 2;
const RXNAV_MAX_ENTRIES: usize = 5;
const RXNAV_DEFAULT_RANK: u32 = 99;

/// Resolves any well-formed Pango lineage designation, listed or not.
#[derive(Debug, Default, Clone, Copy)]
pub struct PangoPatternSource;

impl PangoPatternSource {
    pub fn lineage(surface: &str) -> Option<String> {
        let upper = surface.trim().to_ascii_uppercase();
        PANGO.is_match(&upper).then_some(upper)
    }
}

impl KnowledgeSource for PangoPatternSource {
    fn name(&self) -> &str {
        "pango"
    }

    fn lookup<'a>(&'a self, query: Query<'a>) -> BoxFuture<'a, Result<Vec<Candidate>, LookupError>> {
        let candidates = Self::lineage(query.surface)
            .map(|lineage| Candidate {
                id: format!("pango:{lineage}"),
                name: lineage,
                source: "pango".into(),
                similarity: 1.0,
                rank: PANGO_RANK,
            })
            .into_iter()
            .collect();
        future::ready(Ok(candidates)).boxed()
    }
}

/// NLM RxNav approximate-term search, rescored with the local similarity.
#[derive(Debug, Clone)]
pub struct RxNavSource {
    client: Client,
    base_url: String,
}

impl RxNavSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent("bionlp-service/0.1")
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn approximate(&self, query: Query<'_>) -> Result<Vec<Candidate>, LookupError> {
        let url = format!(
            "{base}/approximateTerm.json?term={term}&maxEntries={max}",
            base = self.base_url,
            term = encode(query.surface),
            max = RXNAV_MAX_ENTRIES,
        );
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(LookupError::Status(resp.status().as_u16()));
        }
        let payload: ApproximateTermResponse = resp
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        let candidates: Vec<Candidate> = payload
            .approximate_group
            .candidate
            .into_iter()
            .filter_map(|raw| {
                let name = raw.name?;
                let score = similarity(query.key, &lookup_key(&name));
                Some(Candidate {
                    id: format!("RXNORM:{}", raw.rxcui),
                    name: name.to_lowercase(),
                    source: "RXNORM".into(),
                    similarity: score,
                    rank: raw
                        .rank
                        .and_then(|r| r.parse().ok())
                        .unwrap_or(RXNAV_DEFAULT_RANK),
                })
            })
            .collect();
        debug!(term = query.surface, hits = candidates.len(), "rxnav candidates");
        Ok(candidates)
    }
}

impl KnowledgeSource for RxNavSource {
    fn name(&self) -> &str {
        "rxnav"
    }

    fn lookup<'a>(&'a self, query: Query<'a>) -> BoxFuture<'a, Result<Vec<Candidate>, LookupError>> {
        self.approximate(query).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct ApproximateTermResponse {
    #[serde(rename = "approximateGroup", default)]
    approximate_group: ApproximateGroup,
}

#[derive(Debug, Default, Deserialize)]
struct ApproximateGroup {
    #[serde(default)]
    candidate: Vec<RxCandidate>,
}

#[derive(Debug, Deserialize)]
struct RxCandidate {
    rxcui: String,
    #[serde(default)]
    rank: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_lineages() {
        assert_eq!(PangoPatternSource::lineage("ba.2.86"), Some("BA.2.86".into()));
        assert_eq!(PangoPatternSource::lineage("XBB.1.5"), Some("XBB.1.5".into()));
        assert_eq!(PangoPatternSource::lineage("BRCA1"), None);
        assert_eq!(PangoPatternSource::lineage("B."), None);
    }

    #[test]
    fn rxnav_payload_tolerates_missing_fields() {
        let payload: ApproximateTermResponse = serde_json::from_str(
            r#"{"approximateGroup":{"inputTerm":null,"candidate":[{"rxcui":"1191","rank":"1","name":"aspirin"},{"rxcui":"42"}]}}"#,
        )
        .unwrap();
        assert_eq!(payload.approximate_group.candidate.len(), 2);
        assert!(payload.approximate_group.candidate[1].name.is_none());
    }
}
