//! Process configuration from environment variables
//!
//! - `YNAB_API_TOKEN`: personal access token (required)
//! - `YNAB_BUDGET_ID`: default budget for tools called without `budget_id`
//!   (default: `last-used`)
//! - `YNAB_API_URL`: API base URL (default: `https://api.ynab.com/v1`)
//! - `YNAB_TIMEOUT_SECS`: per-request timeout in seconds (default: 30)

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.ynab.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    pub access_token: String,
    pub default_budget_id: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            default_budget_id: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let access_token = non_empty("YNAB_API_TOKEN").ok_or_else(|| {
            Error::Config("YNAB_API_TOKEN environment variable is required".to_string())
        })?;

        let timeout_secs = match non_empty("YNAB_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                Error::Config(format!("YNAB_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            access_token,
            default_budget_id: non_empty("YNAB_BUDGET_ID"),
            api_url: non_empty("YNAB_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// Keep the token out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("default_budget_id", &self.default_budget_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
