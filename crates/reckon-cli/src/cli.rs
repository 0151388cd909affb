//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

/// Reckon - Reconcile YNAB accounts against your statements
#[derive(Parser)]
#[command(name = "reckon")]
#[command(about = "YNAB reconciliation tools for LLMs, over MCP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use built-in sample data instead of the YNAB API
    ///
    /// No YNAB_API_TOKEN is needed. Writes are kept in memory and
    /// discarded on exit.
    #[arg(long, global = true)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server (stdio unless --http is given)
    Serve {
        /// Serve Streamable HTTP at /mcp instead of stdio
        #[arg(long)]
        http: bool,

        /// Host to bind to (with --http)
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on (with --http)
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },

    /// List budgets
    Budgets,

    /// List accounts with balances
    Accounts {
        /// Budget ID (defaults to YNAB_BUDGET_ID, then last-used)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Fuzzy search payees by name
    Payees {
        /// Search query
        query: String,

        /// Budget ID (defaults to YNAB_BUDGET_ID, then last-used)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Compare an account's cleared balance with a statement balance
    Reconcile {
        /// Account ID
        #[arg(short, long)]
        account: String,

        /// Statement balance in dollars (negative for card debt)
        #[arg(long, allow_hyphen_values = true)]
        balance: f64,

        /// Budget ID (defaults to YNAB_BUDGET_ID, then last-used)
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// List uncleared transactions for an account
    Uncleared {
        /// Account ID
        #[arg(short, long)]
        account: String,

        /// Budget ID (defaults to YNAB_BUDGET_ID, then last-used)
        #[arg(short, long)]
        budget: Option<String>,
    },
}
