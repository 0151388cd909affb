//! YNAB API models
//!
//! Wire shapes for the subset of the YNAB v1 API that Reckon uses. Amounts
//! are always milliunits. Types derive both `Serialize` and `Deserialize` so
//! the mock server can speak the same format as the real API.

use serde::{Deserialize, Serialize};

use crate::milliunits::Milliunits;

/// Account types listed before all others (in no particular order among themselves)
pub const PRIORITY_ACCOUNT_TYPES: [&str; 3] = ["creditCard", "checking", "savings"];

/// Budget identifier understood by the API as "the most recently used budget"
pub const LAST_USED_BUDGET: &str = "last-used";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_modified_on: Option<String>,
    #[serde(default)]
    pub first_month: Option<String>,
    #[serde(default)]
    pub last_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// YNAB type tag: checking, savings, creditCard, cash, lineOfCredit, ...
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub on_budget: bool,
    #[serde(default)]
    pub closed: bool,
    pub balance: Milliunits,
    pub cleared_balance: Milliunits,
    pub uncleared_balance: Milliunits,
    #[serde(default)]
    pub deleted: bool,
}

impl Account {
    pub fn is_priority_type(&self) -> bool {
        PRIORITY_ACCOUNT_TYPES.contains(&self.account_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Transaction cleared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearedStatus {
    #[default]
    Uncleared,
    Cleared,
    Reconciled,
}

impl ClearedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uncleared => "uncleared",
            Self::Cleared => "cleared",
            Self::Reconciled => "reconciled",
        }
    }

    /// Cleared or reconciled; counts toward the cleared balance
    pub fn is_cleared(&self) -> bool {
        !matches!(self, Self::Uncleared)
    }

    /// Map the tools' boolean flag; `None` means cleared
    pub fn from_flag(cleared: Option<bool>) -> Self {
        if cleared == Some(false) {
            Self::Uncleared
        } else {
            Self::Cleared
        }
    }
}

impl std::fmt::Display for ClearedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as returned by the API, with resolved display names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub id: String,
    /// ISO calendar date (YYYY-MM-DD)
    pub date: String,
    pub amount: Milliunits,
    #[serde(default)]
    pub memo: Option<String>,
    pub cleared: ClearedStatus,
    #[serde(default)]
    pub approved: bool,
    pub account_id: String,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub import_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A new transaction to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub account_id: String,
    pub date: String,
    pub amount: Milliunits,
    pub payee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub cleared: ClearedStatus,
    pub approved: bool,
    /// Deduplication key; the API rejects a second transaction with the same one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
}

/// Partial update; only `Some` fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Milliunits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleared: Option<ClearedStatus>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Result of a create call (single or batch)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveTransactionsResponse {
    #[serde(default)]
    pub transaction_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionDetail>>,
    #[serde(default)]
    pub duplicate_import_ids: Vec<String>,
}

// =============================================================================
// Response envelopes: every successful response is `{"data": {...}}`
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetsData {
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsData {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub account: Account,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesData {
    pub category_groups: Vec<CategoryGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayeesData {
    pub payees: Vec<Payee>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsData {
    pub transactions: Vec<TransactionDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionData {
    pub transaction: TransactionDetail,
}

/// Request body for a single create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTransactionWrapper {
    pub transaction: NewTransaction,
}

/// Request body for a batch create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTransactionsWrapper {
    pub transactions: Vec<NewTransaction>,
}

/// Request body for an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTransactionWrapper {
    pub transaction: TransactionUpdate,
}
