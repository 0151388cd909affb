//! Ledger API client abstraction
//!
//! # Architecture
//!
//! - `LedgerBackend` trait: the YNAB operations the tools need
//! - `LedgerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `HttpBackend` (YNAB REST API), `MockBackend` (in-memory)
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! let client = LedgerClient::from_config(&config)?;
//! let budgets = client.list_budgets().await?;
//! ```

mod http;
mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    Account, Budget, CategoryGroup, NewTransaction, Payee, SaveTransactionsResponse,
    TransactionDetail, TransactionUpdate,
};

/// Operations against a YNAB-compatible ledger
///
/// Every method maps to exactly one API request.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// List budgets visible to the token
    async fn list_budgets(&self) -> Result<Vec<Budget>>;

    /// List all accounts in a budget (including closed and deleted)
    async fn list_accounts(&self, budget_id: &str) -> Result<Vec<Account>>;

    /// Fetch a single account
    async fn get_account(&self, budget_id: &str, account_id: &str) -> Result<Account>;

    /// List category groups with their categories
    async fn list_category_groups(&self, budget_id: &str) -> Result<Vec<CategoryGroup>>;

    /// List payees
    async fn list_payees(&self, budget_id: &str) -> Result<Vec<Payee>>;

    /// Create one transaction
    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: NewTransaction,
    ) -> Result<SaveTransactionsResponse>;

    /// Create several transactions in one request; duplicates (by import id)
    /// are skipped and reported
    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: Vec<NewTransaction>,
    ) -> Result<SaveTransactionsResponse>;

    /// List transactions in an account, optionally on or after `since_date`
    async fn list_account_transactions(
        &self,
        budget_id: &str,
        account_id: &str,
        since_date: Option<&str>,
    ) -> Result<Vec<TransactionDetail>>;

    /// Apply a partial update to a transaction
    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<TransactionDetail>;

    /// Short backend name (for logging)
    fn name(&self) -> &str;
}

/// Concrete ledger client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum LedgerClient {
    /// YNAB REST API over HTTPS
    Http(HttpBackend),
    /// In-memory ledger for tests and offline development
    Mock(MockBackend),
}

impl LedgerClient {
    /// Create an HTTP client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(LedgerClient::Http(HttpBackend::from_config(config)?))
    }

    /// Create a mock client with the default fixture data
    pub fn mock() -> Self {
        LedgerClient::Mock(MockBackend::with_fixtures())
    }
}

// Implement LedgerBackend for LedgerClient by delegating to the inner backend
#[async_trait]
impl LedgerBackend for LedgerClient {
    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        match self {
            LedgerClient::Http(b) => b.list_budgets().await,
            LedgerClient::Mock(b) => b.list_budgets().await,
        }
    }

    async fn list_accounts(&self, budget_id: &str) -> Result<Vec<Account>> {
        match self {
            LedgerClient::Http(b) => b.list_accounts(budget_id).await,
            LedgerClient::Mock(b) => b.list_accounts(budget_id).await,
        }
    }

    async fn get_account(&self, budget_id: &str, account_id: &str) -> Result<Account> {
        match self {
            LedgerClient::Http(b) => b.get_account(budget_id, account_id).await,
            LedgerClient::Mock(b) => b.get_account(budget_id, account_id).await,
        }
    }

    async fn list_category_groups(&self, budget_id: &str) -> Result<Vec<CategoryGroup>> {
        match self {
            LedgerClient::Http(b) => b.list_category_groups(budget_id).await,
            LedgerClient::Mock(b) => b.list_category_groups(budget_id).await,
        }
    }

    async fn list_payees(&self, budget_id: &str) -> Result<Vec<Payee>> {
        match self {
            LedgerClient::Http(b) => b.list_payees(budget_id).await,
            LedgerClient::Mock(b) => b.list_payees(budget_id).await,
        }
    }

    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: NewTransaction,
    ) -> Result<SaveTransactionsResponse> {
        match self {
            LedgerClient::Http(b) => b.create_transaction(budget_id, transaction).await,
            LedgerClient::Mock(b) => b.create_transaction(budget_id, transaction).await,
        }
    }

    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: Vec<NewTransaction>,
    ) -> Result<SaveTransactionsResponse> {
        match self {
            LedgerClient::Http(b) => b.create_transactions(budget_id, transactions).await,
            LedgerClient::Mock(b) => b.create_transactions(budget_id, transactions).await,
        }
    }

    async fn list_account_transactions(
        &self,
        budget_id: &str,
        account_id: &str,
        since_date: Option<&str>,
    ) -> Result<Vec<TransactionDetail>> {
        match self {
            LedgerClient::Http(b) => {
                b.list_account_transactions(budget_id, account_id, since_date)
                    .await
            }
            LedgerClient::Mock(b) => {
                b.list_account_transactions(budget_id, account_id, since_date)
                    .await
            }
        }
    }

    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<TransactionDetail> {
        match self {
            LedgerClient::Http(b) => b.update_transaction(budget_id, transaction_id, update).await,
            LedgerClient::Mock(b) => b.update_transaction(budget_id, transaction_id, update).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            LedgerClient::Http(b) => b.name(),
            LedgerClient::Mock(b) => b.name(),
        }
    }
}
