//! Reckon Core Library
//!
//! Shared functionality for the Reckon YNAB reconciliation tools:
//! - Milliunit conversion and currency formatting
//! - Fuzzy payee matching
//! - Cleared-balance reconciliation
//! - YNAB API models and a pluggable ledger client (HTTP, in-memory mock)
//! - Environment configuration
//! - Tool handlers shared by the MCP server and the CLI

pub mod client;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod milliunits;
pub mod models;
pub mod reconcile;
pub mod tools;

/// Test utilities including a mock YNAB server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::{HttpBackend, LedgerBackend, LedgerClient, MockBackend};
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, Result};
pub use milliunits::{
    checked_to_milliunits, format_currency, to_major, to_milliunits, Milliunits, MAX_MILLIUNITS,
};
pub use reconcile::{ReconciliationResult, ReconciliationStatus};
pub use tools::Ledger;
