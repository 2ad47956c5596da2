//! CLI entry-point for serving the HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, config::Settings, registry::Registry};

pub const DEFAULT_PORT: u16 = 5000;

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind; falls back to $PORT, then 5000.
    #[arg(env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Host address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let registry = Registry::global(&settings)?;
    api::serve(registry, &args.host, args.port).await
}
