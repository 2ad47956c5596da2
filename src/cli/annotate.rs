//! CLI entry-point for one-shot extraction.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api::types::EntitiesResponse, config::Settings, pipeline, registry::Registry};

/// Args for the `annotate` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Document text.
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,
    /// Read the document from a file.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("read {}", path.display()))?,
        (None, None) => bail!("either --text or --file is required"),
    };
    if text.trim().is_empty() {
        bail!("document is empty");
    }

    let registry = Registry::global(&settings)?;
    let response: EntitiesResponse = pipeline::extract_entities(&registry, &text).await?.into();
    let json = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");
    Ok(())
}
