//! Tool implementations for Reckon
//!
//! Each tool validates its arguments, makes one ledger API call (two for
//! `search_payees`, which reuses `list_payees`) and reshapes the result into
//! a JSON-friendly output with amounts in major units. They are used by:
//! 1. The MCP server for external LLM clients
//! 2. The CLI query commands
//!
//! Failures are returned as [`Error`]; the MCP layer turns them into
//! error-flagged tool results.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{LedgerBackend, LedgerClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fuzzy;
use crate::milliunits::{
    checked_to_milliunits, format_currency, to_major, Milliunits, MAX_MILLIUNITS,
};
use crate::models::{
    Account, ClearedStatus, NewTransaction, TransactionDetail, TransactionUpdate, LAST_USED_BUDGET,
};
use crate::reconcile::{self, ReconciliationResult};

// =============================================================================
// Ledger handle (shared by all tools)
// =============================================================================

/// Ledger client plus the budget used when a tool call names none
#[derive(Clone)]
pub struct Ledger {
    client: LedgerClient,
    default_budget_id: Option<String>,
}

impl Ledger {
    pub fn new(client: LedgerClient, default_budget_id: Option<String>) -> Self {
        Self {
            client,
            default_budget_id,
        }
    }

    /// Build an HTTP-backed ledger from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            LedgerClient::from_config(config)?,
            config.default_budget_id.clone(),
        ))
    }

    /// Ledger over the in-memory fixture data
    pub fn mock() -> Self {
        Self::new(LedgerClient::mock(), None)
    }

    pub fn client(&self) -> &LedgerClient {
        &self.client
    }

    /// Explicit budget id, else the configured default, else `last-used`
    pub fn resolve_budget_id(&self, budget_id: Option<&str>) -> String {
        budget_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or(self.default_budget_id.as_deref())
            .unwrap_or(LAST_USED_BUDGET)
            .to_string()
    }
}

// =============================================================================
// Argument validation (shared utility)
// =============================================================================

/// Require a non-blank identifier
pub fn require_id<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidData(format!("{} must not be empty", field)));
    }
    Ok(value)
}

/// Parse an ISO calendar date (YYYY-MM-DD), returning it in canonical form
pub fn parse_date(field: &str, value: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidData(format!(
            "Invalid {}: {}. Use YYYY-MM-DD",
            field, value
        ))
    })?;
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Convert a major-unit amount, rejecting NaN, infinities and amounts
/// beyond one trillion
pub fn parse_amount(field: &str, value: f64) -> Result<Milliunits> {
    if !value.is_finite() {
        return Err(Error::InvalidData(format!("{} must be a finite number", field)));
    }
    checked_to_milliunits(value).ok_or_else(|| {
        Error::InvalidData(format!(
            "{} is out of range: {} (limit is {})",
            field,
            value,
            format_currency(MAX_MILLIUNITS)
        ))
    })
}

/// Treat empty strings as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// =============================================================================
// list_budgets
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BudgetSummary {
    pub id: String,
    pub name: String,
    pub last_modified_on: String,
    pub first_month: String,
    pub last_month: String,
}

pub async fn list_budgets(ledger: &Ledger) -> Result<Vec<BudgetSummary>> {
    let budgets = ledger.client.list_budgets().await?;

    Ok(budgets
        .into_iter()
        .map(|b| BudgetSummary {
            id: b.id,
            name: b.name,
            last_modified_on: b.last_modified_on.unwrap_or_default(),
            first_month: b.first_month.unwrap_or_default(),
            last_month: b.last_month.unwrap_or_default(),
        })
        .collect())
}

// =============================================================================
// list_accounts
// =============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct BudgetParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub on_budget: bool,
    pub closed: bool,
    pub balance: f64,
    pub balance_formatted: String,
    pub cleared_balance: f64,
    pub cleared_balance_formatted: String,
    pub uncleared_balance: f64,
    pub uncleared_balance_formatted: String,
}

impl From<Account> for AccountSummary {
    fn from(a: Account) -> Self {
        Self {
            balance: to_major(a.balance),
            balance_formatted: format_currency(a.balance),
            cleared_balance: to_major(a.cleared_balance),
            cleared_balance_formatted: format_currency(a.cleared_balance),
            uncleared_balance: to_major(a.uncleared_balance),
            uncleared_balance_formatted: format_currency(a.uncleared_balance),
            id: a.id,
            name: a.name,
            account_type: a.account_type,
            on_budget: a.on_budget,
            closed: a.closed,
        }
    }
}

/// Drop deleted accounts; credit cards, checking and savings first, then by name
pub fn sort_accounts(accounts: Vec<Account>) -> Vec<Account> {
    let mut accounts: Vec<Account> = accounts.into_iter().filter(|a| !a.deleted).collect();
    accounts.sort_by(|a, b| {
        b.is_priority_type()
            .cmp(&a.is_priority_type())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    accounts
}

pub async fn list_accounts(ledger: &Ledger, params: BudgetParams) -> Result<Vec<AccountSummary>> {
    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let accounts = ledger.client.list_accounts(&budget_id).await?;

    Ok(sort_accounts(accounts)
        .into_iter()
        .map(AccountSummary::from)
        .collect())
}

// =============================================================================
// get_account_balance
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AccountParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The account ID")]
    pub account_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct AccountBalance {
    pub account_id: String,
    pub account_name: String,
    pub cleared_balance: f64,
    pub cleared_balance_formatted: String,
    pub uncleared_balance: f64,
    pub uncleared_balance_formatted: String,
    pub total_balance: f64,
    pub total_balance_formatted: String,
}

pub async fn get_account_balance(ledger: &Ledger, params: AccountParams) -> Result<AccountBalance> {
    let account_id = require_id("account_id", &params.account_id)?;
    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let account = ledger.client.get_account(&budget_id, account_id).await?;

    Ok(AccountBalance {
        account_id: account.id,
        account_name: account.name,
        cleared_balance: to_major(account.cleared_balance),
        cleared_balance_formatted: format_currency(account.cleared_balance),
        uncleared_balance: to_major(account.uncleared_balance),
        uncleared_balance_formatted: format_currency(account.uncleared_balance),
        total_balance: to_major(account.balance),
        total_balance_formatted: format_currency(account.balance),
    })
}

// =============================================================================
// list_categories
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub hidden: bool,
    pub deleted: bool,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategoryGroupInfo {
    pub id: String,
    pub name: String,
    pub hidden: bool,
    pub deleted: bool,
    pub categories: Vec<CategoryInfo>,
}

pub async fn list_categories(
    ledger: &Ledger,
    params: BudgetParams,
) -> Result<Vec<CategoryGroupInfo>> {
    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let groups = ledger.client.list_category_groups(&budget_id).await?;

    Ok(groups
        .into_iter()
        .filter(|g| !g.deleted && !g.hidden)
        .map(|g| CategoryGroupInfo {
            id: g.id,
            name: g.name,
            hidden: g.hidden,
            deleted: g.deleted,
            categories: g
                .categories
                .into_iter()
                .filter(|c| !c.deleted && !c.hidden)
                .map(|c| CategoryInfo {
                    id: c.id,
                    name: c.name,
                    hidden: c.hidden,
                    deleted: c.deleted,
                })
                .collect(),
        })
        .collect())
}

// =============================================================================
// list_payees / search_payees
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PayeeInfo {
    pub id: String,
    pub name: String,
    pub transfer_account_id: Option<String>,
    pub deleted: bool,
}

pub async fn list_payees(ledger: &Ledger, params: BudgetParams) -> Result<Vec<PayeeInfo>> {
    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let payees = ledger.client.list_payees(&budget_id).await?;

    Ok(payees
        .into_iter()
        .filter(|p| !p.deleted)
        .map(|p| PayeeInfo {
            id: p.id,
            name: p.name,
            transfer_account_id: non_empty(p.transfer_account_id),
            deleted: p.deleted,
        })
        .collect())
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchPayeesParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "Search query to match against payee names")]
    pub query: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PayeeSearchResult {
    pub id: String,
    pub name: String,
    pub score: f64,
}

pub async fn search_payees(
    ledger: &Ledger,
    params: SearchPayeesParams,
) -> Result<Vec<PayeeSearchResult>> {
    let payees = list_payees(
        ledger,
        BudgetParams {
            budget_id: params.budget_id,
        },
    )
    .await?;

    Ok(fuzzy::search(&params.query, payees, |p| p.name.as_str())
        .into_iter()
        .map(|s| PayeeSearchResult {
            id: s.item.id,
            name: s.item.name,
            score: s.score,
        })
        .collect())
}

// =============================================================================
// Transaction output shapes
// =============================================================================

/// A created or updated transaction
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TransactionResult {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub amount_formatted: String,
    pub payee_name: Option<String>,
    pub category_name: Option<String>,
    pub memo: Option<String>,
    /// uncleared, cleared or reconciled
    pub cleared: String,
    pub approved: bool,
}

impl From<TransactionDetail> for TransactionResult {
    fn from(t: TransactionDetail) -> Self {
        Self {
            amount: to_major(t.amount),
            amount_formatted: format_currency(t.amount),
            cleared: t.cleared.as_str().to_string(),
            id: t.id,
            date: t.date,
            payee_name: non_empty(t.payee_name),
            category_name: non_empty(t.category_name),
            memo: non_empty(t.memo),
            approved: t.approved,
        }
    }
}

/// A transaction in a cleared/uncleared listing
#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TransactionListing {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub amount_formatted: String,
    pub payee_name: Option<String>,
    pub category_name: Option<String>,
    pub memo: Option<String>,
}

impl From<TransactionDetail> for TransactionListing {
    fn from(t: TransactionDetail) -> Self {
        Self {
            amount: to_major(t.amount),
            amount_formatted: format_currency(t.amount),
            id: t.id,
            date: t.date,
            payee_name: non_empty(t.payee_name),
            category_name: non_empty(t.category_name),
            memo: non_empty(t.memo),
        }
    }
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TransactionList {
    pub count: usize,
    pub transactions: Vec<TransactionListing>,
}

impl TransactionList {
    fn from_filtered<P>(transactions: Vec<TransactionDetail>, keep: P) -> Self
    where
        P: Fn(&TransactionDetail) -> bool,
    {
        let transactions: Vec<TransactionListing> = transactions
            .into_iter()
            .filter(|t| !t.deleted && keep(t))
            .map(TransactionListing::from)
            .collect();
        Self {
            count: transactions.len(),
            transactions,
        }
    }
}

// =============================================================================
// create_transaction
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateTransactionParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The account ID to create the transaction in")]
    pub account_id: String,

    #[schemars(description = "Transaction date in ISO format (YYYY-MM-DD)")]
    pub date: String,

    #[schemars(
        description = "Amount in dollars (negative for charges like -25.99, positive for credits)"
    )]
    pub amount: f64,

    #[schemars(description = "Name of the payee")]
    pub payee_name: String,

    #[schemars(description = "Category ID for the transaction")]
    pub category_id: Option<String>,

    #[schemars(description = "Optional memo/note")]
    pub memo: Option<String>,

    #[schemars(description = "Whether transaction is cleared (defaults to true for reconciliation)")]
    pub cleared: Option<bool>,
}

/// One entry of a batch
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct TransactionInput {
    #[schemars(description = "Transaction date in ISO format (YYYY-MM-DD)")]
    pub date: String,

    #[schemars(description = "Amount in dollars (negative for charges)")]
    pub amount: f64,

    #[schemars(description = "Name of the payee")]
    pub payee_name: String,

    #[schemars(description = "Category ID")]
    pub category_id: Option<String>,

    #[schemars(description = "Optional memo/note")]
    pub memo: Option<String>,

    #[schemars(description = "Whether cleared (defaults to true)")]
    pub cleared: Option<bool>,

    #[schemars(
        description = "Optional deduplication key; a transaction whose import_id already exists in the account is skipped"
    )]
    pub import_id: Option<String>,
}

/// Validate one input and build the API record (always approved)
fn new_transaction(account_id: &str, input: TransactionInput) -> Result<NewTransaction> {
    Ok(NewTransaction {
        account_id: account_id.to_string(),
        date: parse_date("date", &input.date)?,
        amount: parse_amount("amount", input.amount)?,
        payee_name: require_id("payee_name", &input.payee_name)?.to_string(),
        category_id: non_empty(input.category_id),
        memo: non_empty(input.memo),
        cleared: ClearedStatus::from_flag(input.cleared),
        approved: true,
        import_id: non_empty(input.import_id),
    })
}

pub async fn create_transaction(
    ledger: &Ledger,
    params: CreateTransactionParams,
) -> Result<TransactionResult> {
    let account_id = require_id("account_id", &params.account_id)?;
    let transaction = new_transaction(
        account_id,
        TransactionInput {
            date: params.date,
            amount: params.amount,
            payee_name: params.payee_name,
            category_id: params.category_id,
            memo: params.memo,
            cleared: params.cleared,
            import_id: None,
        },
    )?;

    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let response = ledger
        .client
        .create_transaction(&budget_id, transaction)
        .await?;

    response
        .transaction
        .map(TransactionResult::from)
        .ok_or(Error::NotCreated)
}

// =============================================================================
// create_transactions_batch
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateTransactionsBatchParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The account ID to create transactions in")]
    pub account_id: String,

    #[schemars(description = "Array of transactions to create")]
    pub transactions: Vec<TransactionInput>,

    #[schemars(
        description = "Derive YNAB-style import IDs (YNAB:<milliunits>:<date>:<occurrence>) for entries without one, so re-submitting the same statement skips rows already imported"
    )]
    pub generate_import_ids: Option<bool>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct BatchResult {
    pub created_count: usize,
    pub transactions: Vec<TransactionResult>,
    pub duplicate_import_ids: Vec<String>,
}

/// YNAB import id for the `occurrence`-th transaction with this amount and date
pub fn import_id(amount: Milliunits, date: &str, occurrence: u32) -> String {
    format!("YNAB:{}:{}:{}", amount, date, occurrence)
}

/// Give every transaction without an import id a derived one
///
/// Occurrences count all transactions in the batch sharing an amount and
/// date, in input order, so the ids are stable across re-submissions.
pub fn generate_import_ids(transactions: &mut [NewTransaction]) {
    let mut seen: HashMap<(Milliunits, String), u32> = HashMap::new();
    for t in transactions.iter_mut() {
        let occurrence = seen.entry((t.amount, t.date.clone())).or_insert(0);
        *occurrence += 1;
        if t.import_id.is_none() {
            t.import_id = Some(import_id(t.amount, &t.date, *occurrence));
        }
    }
}

pub async fn create_transactions_batch(
    ledger: &Ledger,
    params: CreateTransactionsBatchParams,
) -> Result<BatchResult> {
    let account_id = require_id("account_id", &params.account_id)?;
    if params.transactions.is_empty() {
        return Err(Error::InvalidData(
            "transactions must contain at least one entry".to_string(),
        ));
    }

    let mut transactions = params
        .transactions
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            new_transaction(account_id, input).map_err(|e| match e {
                Error::InvalidData(msg) => Error::InvalidData(format!("transactions[{}]: {}", i, msg)),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if params.generate_import_ids.unwrap_or(false) {
        generate_import_ids(&mut transactions);
    }

    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let submitted = transactions.len();
    let response = ledger
        .client
        .create_transactions(&budget_id, transactions)
        .await?;

    let created: Vec<TransactionResult> = response
        .transactions
        .unwrap_or_default()
        .into_iter()
        .map(TransactionResult::from)
        .collect();
    debug!(
        submitted,
        created = created.len(),
        duplicates = response.duplicate_import_ids.len(),
        "Batch create finished"
    );

    Ok(BatchResult {
        created_count: created.len(),
        transactions: created,
        duplicate_import_ids: response.duplicate_import_ids,
    })
}

// =============================================================================
// get_uncleared_transactions / get_cleared_transactions
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearedTransactionsParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The account ID to get cleared transactions for")]
    pub account_id: String,

    #[schemars(description = "Only return transactions on or after this date (YYYY-MM-DD)")]
    pub since_date: Option<String>,
}

pub async fn get_uncleared_transactions(
    ledger: &Ledger,
    params: AccountParams,
) -> Result<TransactionList> {
    let account_id = require_id("account_id", &params.account_id)?;
    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let transactions = ledger
        .client
        .list_account_transactions(&budget_id, account_id, None)
        .await?;

    Ok(TransactionList::from_filtered(transactions, |t| {
        t.cleared == ClearedStatus::Uncleared
    }))
}

pub async fn get_cleared_transactions(
    ledger: &Ledger,
    params: ClearedTransactionsParams,
) -> Result<TransactionList> {
    let account_id = require_id("account_id", &params.account_id)?;
    let since_date = non_empty(params.since_date)
        .map(|d| parse_date("since_date", &d))
        .transpose()?;

    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let transactions = ledger
        .client
        .list_account_transactions(&budget_id, account_id, since_date.as_deref())
        .await?;

    Ok(TransactionList::from_filtered(transactions, |t| {
        t.cleared.is_cleared()
    }))
}

// =============================================================================
// clear_transaction / update_transaction
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearTransactionParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The transaction ID to mark as cleared")]
    pub transaction_id: String,
}

pub async fn clear_transaction(
    ledger: &Ledger,
    params: ClearTransactionParams,
) -> Result<TransactionResult> {
    let transaction_id = require_id("transaction_id", &params.transaction_id)?;
    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let update = TransactionUpdate {
        cleared: Some(ClearedStatus::Cleared),
        ..Default::default()
    };

    let updated = ledger
        .client
        .update_transaction(&budget_id, transaction_id, update)
        .await?;
    Ok(updated.into())
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateTransactionParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The transaction ID to update")]
    pub transaction_id: String,

    #[schemars(description = "New amount in dollars (negative for charges, positive for credits)")]
    pub amount: Option<f64>,

    #[schemars(description = "New date in ISO format (YYYY-MM-DD)")]
    pub date: Option<String>,

    #[schemars(description = "New payee name")]
    pub payee_name: Option<String>,

    #[schemars(description = "New category ID")]
    pub category_id: Option<String>,

    #[schemars(description = "New memo/note")]
    pub memo: Option<String>,

    #[schemars(description = "Whether transaction is cleared")]
    pub cleared: Option<bool>,
}

pub async fn update_transaction(
    ledger: &Ledger,
    params: UpdateTransactionParams,
) -> Result<TransactionResult> {
    let transaction_id = require_id("transaction_id", &params.transaction_id)?;

    let update = TransactionUpdate {
        amount: params.amount.map(|a| parse_amount("amount", a)).transpose()?,
        date: params.date.map(|d| parse_date("date", &d)).transpose()?,
        payee_name: params.payee_name,
        category_id: params.category_id,
        // An explicit empty memo clears it
        memo: params.memo,
        cleared: params.cleared.map(|c| {
            if c {
                ClearedStatus::Cleared
            } else {
                ClearedStatus::Uncleared
            }
        }),
    };
    if update.is_empty() {
        return Err(Error::InvalidData(
            "update_transaction needs at least one field to change".to_string(),
        ));
    }

    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let updated = ledger
        .client
        .update_transaction(&budget_id, transaction_id, update)
        .await?;
    Ok(updated.into())
}

// =============================================================================
// reconciliation_check
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReconciliationCheckParams {
    #[schemars(description = "Budget ID (uses default or last-used if not provided)")]
    pub budget_id: Option<String>,

    #[schemars(description = "The account ID to check")]
    pub account_id: String,

    #[schemars(
        description = "The actual balance from your bank/card in dollars (e.g., -1234.56 for credit card debt)"
    )]
    pub actual_balance: f64,
}

pub async fn reconciliation_check(
    ledger: &Ledger,
    params: ReconciliationCheckParams,
) -> Result<ReconciliationResult> {
    let account_id = require_id("account_id", &params.account_id)?;
    parse_amount("actual_balance", params.actual_balance)?;

    let budget_id = ledger.resolve_budget_id(params.budget_id.as_deref());
    let account = ledger.client.get_account(&budget_id, account_id).await?;

    reconcile::compare(
        &account.name,
        account.cleared_balance,
        params.actual_balance,
    )
}
