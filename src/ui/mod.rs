//! HTML views: landing page and entity highlighting.

use askama::Template;

use crate::{nlp::RawMention, registry::CategoryStatus};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    version: &'a str,
    categories: &'a [CategoryStatus],
}

#[derive(Template)]
#[template(path = "entities.html")]
struct EntitiesTemplate<'a> {
    fragments: Vec<Fragment<'a>>,
}

struct Fragment<'a> {
    text: &'a str,
    label: &'static str,
    color: &'static str,
    is_entity: bool,
}

impl<'a> Fragment<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            label: "",
            color: "",
            is_entity: false,
        }
    }
}

/// Render the landing page.
pub fn render_index(categories: &[CategoryStatus]) -> askama::Result<String> {
    IndexTemplate {
        version: env!("CARGO_PKG_VERSION"),
        categories,
    }
    .render()
}

/// Render `text` with every mention wrapped in a labelled `<mark>`.
///
/// Mentions are drawn in start order; a mention overlapping an earlier one or
/// not falling on character boundaries is left as plain text.
pub fn render_entities(text: &str, mentions: &[RawMention]) -> askama::Result<String> {
    let mut ordered: Vec<&RawMention> = mentions.iter().collect();
    ordered.sort_by_key(|m| (m.start, m.end));

    let mut fragments = Vec::with_capacity(ordered.len() * 2 + 1);
    let mut cursor = 0usize;
    for mention in ordered {
        if mention.start < cursor || mention.start >= mention.end {
            continue;
        }
        let (Some(before), Some(span)) = (
            text.get(cursor..mention.start),
            text.get(mention.start..mention.end),
        ) else {
            continue;
        };
        if !before.is_empty() {
            fragments.push(Fragment::plain(before));
        }
        fragments.push(Fragment {
            text: span,
            label: mention.label.as_str(),
            color: mention.label.color(),
            is_entity: true,
        });
        cursor = mention.end;
    }
    if let Some(rest) = text.get(cursor..) {
        if !rest.is_empty() {
            fragments.push(Fragment::plain(rest));
        }
    }

    EntitiesTemplate { fragments }.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::EntityLabel;

    #[test]
    fn wraps_mentions_and_escapes_text() {
        let text = "Aspirin <b> pain";
        let mentions = vec![RawMention {
            text: "Aspirin".into(),
            label: EntityLabel::Chemical,
            start: 0,
            end: 7,
        }];
        let html = render_entities(text, &mentions).unwrap();
        assert!(html.contains("Aspirin<span"));
        assert!(html.contains("CHEMICAL"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn plain_text_without_mentions() {
        let html = render_entities("no entities here", &[]).unwrap();
        assert!(html.contains("no entities here"));
        assert!(!html.contains("<mark"));
    }
}
