//! Mention deduplication.

use indexmap::IndexMap;

/// Case-insensitive, order-preserving deduplication of mention texts.
///
/// The first-seen casing of every term is kept and terms of at most one
/// character are discarded as recognition noise.
pub fn unique_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = IndexMap::<String, String>::new();
    for term in terms {
        let term = term.as_ref();
        if term.chars().count() <= 1 {
            continue;
        }
        seen.entry(term.to_lowercase())
            .or_insert_with(|| term.to_string());
    }
    seen.into_values().collect()
}
