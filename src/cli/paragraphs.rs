//! CLI entry-point exposing the paragraph segmenter.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::instrument;

use crate::nlp::{paragraphs, Document};

/// Args for the `paragraphs` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Document to segment.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ParagraphLine<'a> {
    index: usize,
    start_byte: usize,
    end_byte: usize,
    tokens: usize,
    text: &'a str,
}

#[instrument]
pub async fn run(args: Args) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("read {}", args.file.display()))?;
    let doc = Document::tokenize(&text);
    for (index, span) in paragraphs(&doc).enumerate() {
        let line = ParagraphLine {
            index,
            start_byte: span.start_byte,
            end_byte: span.end_byte,
            tokens: span.end - span.start,
            text: span.text,
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}
