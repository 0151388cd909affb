//! Shared command utilities

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use reckon_core::{Config, Ledger};

/// Build the ledger: fixture data with `--mock`, otherwise the YNAB API
pub fn open_ledger(mock: bool) -> Result<Ledger> {
    if mock {
        debug!("Using in-memory sample ledger");
        return Ok(Ledger::mock());
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    debug!(?config, "Loaded configuration");
    Ledger::from_config(&config).context("Failed to create YNAB client")
}

/// Render a value as pretty JSON text
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format output")
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}
