//! CLI entry-point reporting model bundle completeness.

use anyhow::{bail, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{config::Settings, data::bundle, nlp::EntityLabel};

/// Args for the `check-models` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Exit with an error when any bundle is incomplete.
    #[arg(long)]
    pub strict: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let mut incomplete = Vec::new();
    for label in EntityLabel::ALL {
        let status = bundle::inspect(&settings.model_root, label);
        if status.is_complete() {
            info!(%label, dir = %status.dir.display(), "bundle complete");
        } else {
            warn!(%label, dir = %status.dir.display(), missing = ?status.missing(), "bundle incomplete");
            incomplete.push(label);
        }
        println!("{}", serde_json::to_string(&status)?);
    }
    if args.strict && !incomplete.is_empty() {
        bail!("incomplete model bundles: {incomplete:?}");
    }
    Ok(())
}
