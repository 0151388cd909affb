//! Direct ledger commands
//!
//! Each command runs the same handler the matching MCP tool uses and prints
//! its result as JSON.

use anyhow::{Context, Result};

use reckon_core::tools::{
    self, AccountParams, BudgetParams, ReconciliationCheckParams, SearchPayeesParams,
};
use reckon_core::Ledger;

use super::print_json;

pub async fn cmd_budgets(ledger: &Ledger) -> Result<()> {
    let budgets = tools::list_budgets(ledger)
        .await
        .context("Failed to list budgets")?;
    print_json(&budgets)
}

pub async fn cmd_accounts(ledger: &Ledger, budget_id: Option<String>) -> Result<()> {
    let accounts = tools::list_accounts(ledger, BudgetParams { budget_id })
        .await
        .context("Failed to list accounts")?;
    print_json(&accounts)
}

pub async fn cmd_payees(ledger: &Ledger, query: String, budget_id: Option<String>) -> Result<()> {
    let matches = tools::search_payees(ledger, SearchPayeesParams { budget_id, query })
        .await
        .context("Failed to search payees")?;
    print_json(&matches)
}

pub async fn cmd_reconcile(
    ledger: &Ledger,
    account_id: String,
    actual_balance: f64,
    budget_id: Option<String>,
) -> Result<()> {
    let result = tools::reconciliation_check(
        ledger,
        ReconciliationCheckParams {
            budget_id,
            account_id,
            actual_balance,
        },
    )
    .await
    .context("Failed to check reconciliation")?;
    print_json(&result)
}

pub async fn cmd_uncleared(
    ledger: &Ledger,
    account_id: String,
    budget_id: Option<String>,
) -> Result<()> {
    let list = tools::get_uncleared_transactions(
        ledger,
        AccountParams {
            budget_id,
            account_id,
        },
    )
    .await
    .context("Failed to list uncleared transactions")?;
    print_json(&list)
}
