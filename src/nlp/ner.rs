//! Dictionary-based entity recognition. Swap with a transformer tagger by
//! implementing [`Annotator`].

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::{EntityLabel, RawMention};

const REGEX_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Trait for recognisers producing labelled spans over a document.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Vec<RawMention>;

    /// Labels this annotator is able to emit.
    fn labels(&self) -> Vec<EntityLabel>;
}

/// Gazetteer annotator compiled from vocabulary terms and extra patterns.
#[derive(Debug, Clone)]
pub struct GazetteerAnnotator {
    matchers: Vec<(EntityLabel, Regex)>,
}

#[derive(Debug, Default)]
pub struct GazetteerBuilder {
    terms: BTreeMap<EntityLabel, Vec<String>>,
    patterns: BTreeMap<EntityLabel, Vec<String>>,
}

impl GazetteerBuilder {
    /// Register case-insensitive literal terms for a label.
    pub fn terms<I, S>(mut self, label: EntityLabel, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms
            .entry(label)
            .or_default()
            .extend(terms.into_iter().map(Into::into));
        self
    }

    /// Register a raw regex (case-sensitive) for a label.
    pub fn pattern(mut self, label: EntityLabel, pattern: impl Into<String>) -> Self {
        self.patterns.entry(label).or_default().push(pattern.into());
        self
    }

    pub fn build(self) -> Result<GazetteerAnnotator, regex::Error> {
        let mut matchers = Vec::new();
        for label in EntityLabel::ALL {
            let mut terms: Vec<String> = self
                .terms
                .get(&label)
                .map(|t| {
                    t.iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| s.chars().count() > 1)
                        .collect()
                })
                .unwrap_or_default();
            // Longest alternatives first so that "type 2 diabetes" beats "diabetes".
            terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            terms.dedup();

            // Alternation is leftmost-first, so literals and each pattern get
            // their own matcher and compete on length in `annotate`.
            if !terms.is_empty() {
                let literal = terms
                    .iter()
                    .map(|t| bounded(t))
                    .collect::<Vec<_>>()
                    .join("|");
                matchers.push((label, compile(&format!("(?i:{literal})"))?));
            }
            let patterns = self.patterns.get(&label).map(Vec::as_slice).unwrap_or_default();
            for pattern in patterns {
                matchers.push((label, compile(pattern)?));
            }
            debug!(%label, terms = terms.len(), patterns = patterns.len(), "compiled gazetteer");
        }
        Ok(GazetteerAnnotator { matchers })
    }
}

impl GazetteerAnnotator {
    pub fn builder() -> GazetteerBuilder {
        GazetteerBuilder::default()
    }
}

impl Annotator for GazetteerAnnotator {
    fn annotate(&self, text: &str) -> Vec<RawMention> {
        let mut hits: Vec<(usize, usize, EntityLabel)> = self
            .matchers
            .iter()
            .flat_map(|(label, regex)| {
                regex
                    .find_iter(text)
                    .filter(|m| !m.is_empty())
                    .map(move |m| (m.start(), m.end(), *label))
            })
            .collect();
        hits.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| (b.1 - b.0).cmp(&(a.1 - a.0)))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut mentions: Vec<RawMention> = Vec::with_capacity(hits.len());
        let mut covered_until = 0usize;
        for (start, end, label) in hits {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            mentions.push(RawMention {
                text: text[start..end].to_string(),
                label,
                start,
                end,
            });
        }
        mentions
    }

    fn labels(&self) -> Vec<EntityLabel> {
        let mut labels: Vec<EntityLabel> = self.matchers.iter().map(|(label, _)| *label).collect();
        labels.dedup();
        labels
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

/// Escape a literal term and anchor it on word boundaries where the term
/// itself starts or ends with a word character.
fn bounded(term: &str) -> String {
    let escaped = regex::escape(term);
    let head = term.chars().next().is_some_and(is_word_char);
    let tail = term.chars().last().is_some_and(is_word_char);
    format!(
        "{}{}{}",
        if head { r"\b" } else { "" },
        escaped,
        if tail { r"\b" } else { "" }
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotator() -> GazetteerAnnotator {
        GazetteerAnnotator::builder()
            .terms(EntityLabel::Disease, ["diabetes", "type 2 diabetes"])
            .terms(EntityLabel::Chemical, ["aspirin"])
            .terms(EntityLabel::Genetic, ["BRCA1"])
            .build()
            .unwrap()
    }

    #[test]
    fn longest_match_wins() {
        let mentions = annotator().annotate("Type 2 diabetes and aspirin");
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].text, "Type 2 diabetes");
        assert_eq!(mentions[0].label, EntityLabel::Disease);
        assert_eq!((mentions[1].start, mentions[1].end), (20, 27));
    }

    #[test]
    fn respects_word_boundaries() {
        let mentions = annotator().annotate("aspirinate and xBRCA1");
        assert!(mentions.is_empty());
    }

    #[test]
    fn patterns_are_case_sensitive() {
        let annotator = GazetteerAnnotator::builder()
            .pattern(EntityLabel::Genetic, r"\b[A-Z]{1,3}(?:\.\d+)+\b")
            .build()
            .unwrap();
        let mentions = annotator.annotate("lineage B.1.1.7 not b.1.1.7");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].text, "B.1.1.7");
    }

    #[test]
    fn longer_pattern_hit_beats_shorter_literal() {
        let annotator = GazetteerAnnotator::builder()
            .terms(EntityLabel::Genetic, ["BA.2", "BRCA1"])
            .pattern(EntityLabel::Genetic, r"\b[A-Z]{1,3}(?:\.\d+){1,4}\b")
            .build()
            .unwrap();
        let mentions = annotator.annotate("BA.2.86 and BA.2 alongside BRCA1");
        let texts: Vec<&str> = mentions.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["BA.2.86", "BA.2", "BRCA1"]);
        assert_eq!(annotator.labels(), vec![EntityLabel::Genetic]);
    }
}
