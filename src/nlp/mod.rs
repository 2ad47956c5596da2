//! Entity recognition, term hygiene and document segmentation.

pub mod ner;
pub mod paragraphs;
pub mod terms;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use ner::{Annotator, GazetteerAnnotator};
pub use paragraphs::{paragraphs, Document, Paragraphs, Span, Token};
pub use terms::unique_terms;

/// Coarse label assigned to a recognised span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    Disease,
    Chemical,
    Genetic,
}

impl EntityLabel {
    pub const ALL: [EntityLabel; 3] = [Self::Disease, Self::Chemical, Self::Genetic];

    /// Upper-case tag used in rendered markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disease => "DISEASE",
            Self::Chemical => "CHEMICAL",
            Self::Genetic => "GENETIC",
        }
    }

    /// Directory name of the category's model bundle under the model root.
    pub fn bundle_dir(self) -> &'static str {
        match self {
            Self::Disease => "Disease",
            Self::Chemical => "Chemical",
            Self::Genetic => "Gene",
        }
    }

    /// Highlight colour for the entity markup.
    pub fn color(self) -> &'static str {
        match self {
            Self::Disease => "linear-gradient(90deg, #aa9cfc, #fc9ce7)",
            Self::Chemical => "linear-gradient(90deg, #ffa17f, #3575ad)",
            Self::Genetic => "linear-gradient(90deg, #c21500, #ffc500)",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span produced by an [`Annotator`], with byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMention {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Mention texts grouped by label, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    pub diseases: Vec<String>,
    pub chemicals: Vec<String>,
    pub genetics: Vec<String>,
}

impl Partitioned {
    pub fn from_mentions<'a, I>(mentions: I) -> Self
    where
        I: IntoIterator<Item = &'a RawMention>,
    {
        let mut out = Self::default();
        for mention in mentions {
            let bucket = match mention.label {
                EntityLabel::Disease => &mut out.diseases,
                EntityLabel::Chemical => &mut out.chemicals,
                EntityLabel::Genetic => &mut out.genetics,
            };
            bucket.push(mention.text.clone());
        }
        out
    }
}
