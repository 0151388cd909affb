//! Server command implementation

use anyhow::{Context, Result};
use tracing::info;

use reckon_core::{Ledger, LedgerBackend};

pub async fn cmd_serve(ledger: Ledger, http: bool, host: &str, port: u16) -> Result<()> {
    info!(backend = ledger.client().name(), "Starting Reckon MCP server");

    if http {
        info!("Press Ctrl+C to stop");
        reckon_server::start_mcp_server(ledger, host, port)
            .await
            .with_context(|| format!("MCP server on {}:{} failed", host, port))
    } else {
        reckon_server::serve_stdio(ledger)
            .await
            .context("MCP stdio server failed")
    }
}
