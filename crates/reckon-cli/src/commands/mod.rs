//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (ledger construction, JSON output)
//! - `query` - Direct ledger commands (budgets, accounts, payees, reconcile, uncleared)
//! - `serve` - MCP server command

pub mod core;
pub mod query;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use query::*;
pub use serve::*;
