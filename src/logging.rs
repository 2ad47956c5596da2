//! Tracing setup for the server and CLI.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVES: &str = "info,tower_http=info";

/// Install the process-wide subscriber. A second call is a no-op.
///
/// Events go to stderr: `annotate`, `check-models` and `paragraphs` print
/// JSON on stdout.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let events = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter()?);

    tracing_subscriber::registry()
        .with(events)
        .try_init()
        .context("installing tracing subscriber")?;
    tracing::debug!(directives = %filter_source(), "tracing ready");
    Ok(())
}

fn filter() -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(DEFAULT_DIRECTIVES).context("parsing default log directives"),
    }
}

fn filter_source() -> String {
    std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_string())
}
