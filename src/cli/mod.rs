//! Command-line interface wiring for bionlp-service.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod annotate;
pub mod check_models;
pub mod paragraphs;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Biomedical entity extraction and normalisation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Annotate(args) => annotate::run(args, settings).await,
            Commands::CheckModels(args) => check_models::run(args, settings).await,
            Commands::Paragraphs(args) => paragraphs::run(args).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the JSON API and landing page.
    Serve(serve::Args),
    /// Run extraction and normalisation over one document.
    Annotate(annotate::Args),
    /// Report model bundle completeness per category.
    CheckModels(check_models::Args),
    /// Split a document into paragraph spans.
    Paragraphs(paragraphs::Args),
}
