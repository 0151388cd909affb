//! Reckon CLI - YNAB reconciliation over MCP
//!
//! Usage:
//!   reckon serve                       MCP server on stdio
//!   reckon serve --http --port 3001    MCP server over Streamable HTTP
//!   reckon accounts                    List accounts with balances
//!   reckon reconcile -a ID --balance N Compare cleared balance to a statement

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stdout carries the stdio MCP transport
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let ledger = commands::open_ledger(cli.mock)?;

    match cli.command {
        Commands::Serve { http, host, port } => {
            commands::cmd_serve(ledger, http, &host, port).await
        }
        Commands::Budgets => commands::cmd_budgets(&ledger).await,
        Commands::Accounts { budget } => commands::cmd_accounts(&ledger, budget).await,
        Commands::Payees { query, budget } => {
            commands::cmd_payees(&ledger, query, budget).await
        }
        Commands::Reconcile {
            account,
            balance,
            budget,
        } => commands::cmd_reconcile(&ledger, account, balance, budget).await,
        Commands::Uncleared { account, budget } => {
            commands::cmd_uncleared(&ledger, account, budget).await
        }
    }
}
