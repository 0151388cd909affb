//! Mock backend for testing
//!
//! An in-memory ledger that follows the API's observable rules: budget
//! lookup (including `last-used`), import-id deduplication, payee creation
//! on first use and balance bookkeeping for cleared and uncleared amounts.
//! Useful for unit tests and for running the tools without a YNAB account.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{ApiError, Error, ErrorDetail, Result};
use crate::milliunits::Milliunits;
use crate::models::{
    Account, Budget, Category, CategoryGroup, ClearedStatus, NewTransaction, Payee,
    SaveTransactionsResponse, TransactionDetail, TransactionUpdate, LAST_USED_BUDGET,
};

use super::LedgerBackend;

/// Contents of the mock ledger (a single budget)
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    pub budget: Option<Budget>,
    pub accounts: Vec<Account>,
    pub category_groups: Vec<CategoryGroup>,
    pub payees: Vec<Payee>,
    pub transactions: Vec<TransactionDetail>,
    next_id: u64,
}

impl MockLedger {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn check_budget(&self, budget_id: &str) -> Result<()> {
        match &self.budget {
            Some(b) if budget_id == LAST_USED_BUDGET || budget_id == b.id => Ok(()),
            _ => Err(not_found("Budget not found")),
        }
    }

    fn account_mut(&mut self, account_id: &str) -> Result<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.id == account_id && !a.deleted)
            .ok_or_else(|| not_found("Account not found"))
    }

    fn category_name(&self, category_id: &str) -> Option<String> {
        self.category_groups
            .iter()
            .flat_map(|g| g.categories.iter())
            .find(|c| c.id == category_id)
            .map(|c| c.name.clone())
    }

    /// Find a payee by exact name, creating it if needed
    fn payee_id_for(&mut self, name: &str) -> String {
        if let Some(p) = self.payees.iter().find(|p| p.name == name && !p.deleted) {
            return p.id.clone();
        }
        let id = self.next_id("payee");
        self.payees.push(Payee {
            id: id.clone(),
            name: name.to_string(),
            transfer_account_id: None,
            deleted: false,
        });
        id
    }

    fn apply_balance(&mut self, account_id: &str, amount: Milliunits, cleared: ClearedStatus) {
        if let Some(account) = self.accounts.iter_mut().find(|a| a.id == account_id) {
            account.balance += amount;
            if cleared.is_cleared() {
                account.cleared_balance += amount;
            } else {
                account.uncleared_balance += amount;
            }
        }
    }

    fn is_duplicate(&self, account_id: &str, import_id: &str) -> bool {
        self.transactions
            .iter()
            .any(|t| t.account_id == account_id && t.import_id.as_deref() == Some(import_id))
    }

    fn insert(&mut self, new: NewTransaction) -> Result<TransactionDetail> {
        self.account_mut(&new.account_id)?;

        let category_name = match new.category_id.as_deref() {
            Some(id) => Some(
                self.category_name(id)
                    .ok_or_else(|| validation_failed("category_id does not exist"))?,
            ),
            None => None,
        };

        let payee_id = self.payee_id_for(&new.payee_name);
        let transaction = TransactionDetail {
            id: self.next_id("tx"),
            date: new.date,
            amount: new.amount,
            memo: new.memo,
            cleared: new.cleared,
            approved: new.approved,
            account_id: new.account_id,
            payee_id: Some(payee_id),
            payee_name: Some(new.payee_name),
            category_id: new.category_id,
            category_name,
            import_id: new.import_id,
            deleted: false,
        };

        self.apply_balance(&transaction.account_id, transaction.amount, transaction.cleared);
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Insert the non-duplicates in order; report the duplicate import ids
    ///
    /// All or nothing: rows are applied to a staged copy that replaces the
    /// ledger only when every row succeeds.
    fn insert_all(
        &mut self,
        transactions: Vec<NewTransaction>,
    ) -> Result<(Vec<TransactionDetail>, Vec<String>)> {
        let mut staged = self.clone();
        let mut created = Vec::new();
        let mut duplicates = Vec::new();

        for new in transactions {
            if let Some(import_id) = new.import_id.as_deref() {
                if staged.is_duplicate(&new.account_id, import_id) {
                    duplicates.push(import_id.to_string());
                    continue;
                }
            }
            created.push(staged.insert(new)?);
        }

        *self = staged;
        Ok((created, duplicates))
    }
}

fn not_found(detail: &str) -> Error {
    ApiError::NotFound(ErrorDetail::new("404.2", "resource_not_found", detail)).into()
}

fn validation_failed(detail: &str) -> Error {
    ApiError::ValidationFailed(ErrorDetail::new("400", "bad_request", detail)).into()
}

/// Mock ledger backend
///
/// Cloning shares the underlying ledger, so a test can keep a handle and
/// inspect what the tools wrote.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<RwLock<MockLedger>>,
    failure: Arc<RwLock<Option<ApiError>>>,
}

impl MockBackend {
    /// Create an empty mock (no budget: every budget lookup fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock from prepared ledger contents
    pub fn with_ledger(ledger: MockLedger) -> Self {
        Self {
            state: Arc::new(RwLock::new(ledger)),
            failure: Arc::default(),
        }
    }

    /// Create a mock with a small household budget
    pub fn with_fixtures() -> Self {
        Self::with_ledger(fixtures())
    }

    /// Make every subsequent call fail with `error`
    pub fn fail_with(&self, error: ApiError) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = Some(error);
        }
    }

    /// Undo [`fail_with`](Self::fail_with)
    pub fn clear_failure(&self) {
        if let Ok(mut failure) = self.failure.write() {
            *failure = None;
        }
    }

    /// Snapshot of the ledger contents
    pub fn snapshot(&self) -> Result<MockLedger> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MockLedger>> {
        self.state
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire mock ledger lock".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MockLedger>> {
        self.state
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire mock ledger lock".into()))
    }

    fn check_failure(&self) -> Result<()> {
        let failure = self
            .failure
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire mock failure lock".into()))?;
        match failure.as_ref() {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerBackend for MockBackend {
    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.check_failure()?;
        Ok(self.read()?.budget.iter().cloned().collect())
    }

    async fn list_accounts(&self, budget_id: &str) -> Result<Vec<Account>> {
        self.check_failure()?;
        let ledger = self.read()?;
        ledger.check_budget(budget_id)?;
        Ok(ledger.accounts.clone())
    }

    async fn get_account(&self, budget_id: &str, account_id: &str) -> Result<Account> {
        self.check_failure()?;
        let ledger = self.read()?;
        ledger.check_budget(budget_id)?;
        ledger
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| not_found("Account not found"))
    }

    async fn list_category_groups(&self, budget_id: &str) -> Result<Vec<CategoryGroup>> {
        self.check_failure()?;
        let ledger = self.read()?;
        ledger.check_budget(budget_id)?;
        Ok(ledger.category_groups.clone())
    }

    async fn list_payees(&self, budget_id: &str) -> Result<Vec<Payee>> {
        self.check_failure()?;
        let ledger = self.read()?;
        ledger.check_budget(budget_id)?;
        Ok(ledger.payees.clone())
    }

    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: NewTransaction,
    ) -> Result<SaveTransactionsResponse> {
        self.check_failure()?;
        let mut ledger = self.write()?;
        ledger.check_budget(budget_id)?;

        let (created, duplicate_import_ids) = ledger.insert_all(vec![transaction])?;
        let created = created.into_iter().next();
        Ok(SaveTransactionsResponse {
            transaction_ids: created.iter().map(|t| t.id.clone()).collect(),
            transaction: created,
            transactions: None,
            duplicate_import_ids,
        })
    }

    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: Vec<NewTransaction>,
    ) -> Result<SaveTransactionsResponse> {
        self.check_failure()?;
        let mut ledger = self.write()?;
        ledger.check_budget(budget_id)?;

        let (created, duplicate_import_ids) = ledger.insert_all(transactions)?;
        Ok(SaveTransactionsResponse {
            transaction_ids: created.iter().map(|t| t.id.clone()).collect(),
            transaction: None,
            transactions: Some(created),
            duplicate_import_ids,
        })
    }

    async fn list_account_transactions(
        &self,
        budget_id: &str,
        account_id: &str,
        since_date: Option<&str>,
    ) -> Result<Vec<TransactionDetail>> {
        self.check_failure()?;
        let ledger = self.read()?;
        ledger.check_budget(budget_id)?;
        if !ledger.accounts.iter().any(|a| a.id == account_id) {
            return Err(not_found("Account not found"));
        }

        let mut transactions: Vec<TransactionDetail> = ledger
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            // ISO dates order lexicographically
            .filter(|t| since_date.map_or(true, |since| t.date.as_str() >= since))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(transactions)
    }

    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<TransactionDetail> {
        self.check_failure()?;
        let mut ledger = self.write()?;
        ledger.check_budget(budget_id)?;

        let index = ledger
            .transactions
            .iter()
            .position(|t| t.id == transaction_id && !t.deleted)
            .ok_or_else(|| not_found("Transaction not found"))?;

        let category_name = match update.category_id.as_deref() {
            Some(id) => Some(
                ledger
                    .category_name(id)
                    .ok_or_else(|| validation_failed("category_id does not exist"))?,
            ),
            None => None,
        };
        let payee_id = update.payee_name.as_deref().map(|n| ledger.payee_id_for(n));

        let before = ledger.transactions[index].clone();
        ledger.apply_balance(&before.account_id, -before.amount, before.cleared);

        let tx = &mut ledger.transactions[index];
        if let Some(amount) = update.amount {
            tx.amount = amount;
        }
        if let Some(date) = update.date {
            tx.date = date;
        }
        if let Some(name) = update.payee_name {
            tx.payee_name = Some(name);
            tx.payee_id = payee_id;
        }
        if let Some(category_id) = update.category_id {
            tx.category_id = Some(category_id);
            tx.category_name = category_name;
        }
        if let Some(memo) = update.memo {
            tx.memo = Some(memo);
        }
        if let Some(cleared) = update.cleared {
            tx.cleared = cleared;
        }
        let after = tx.clone();

        ledger.apply_balance(&after.account_id, after.amount, after.cleared);
        Ok(after)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn account(
    id: &str,
    name: &str,
    account_type: &str,
    cleared_balance: Milliunits,
    uncleared_balance: Milliunits,
) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: account_type.to_string(),
        on_budget: true,
        closed: false,
        balance: cleared_balance + uncleared_balance,
        cleared_balance,
        uncleared_balance,
        deleted: false,
    }
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        hidden: false,
        deleted: false,
    }
}

fn payee(id: &str, name: &str) -> Payee {
    Payee {
        id: id.to_string(),
        name: name.to_string(),
        transfer_account_id: None,
        deleted: false,
    }
}

fn transaction(
    id: &str,
    account_id: &str,
    date: &str,
    amount: Milliunits,
    payee: (&str, &str),
    category: Option<(&str, &str)>,
    cleared: ClearedStatus,
) -> TransactionDetail {
    TransactionDetail {
        id: id.to_string(),
        date: date.to_string(),
        amount,
        memo: None,
        cleared,
        approved: true,
        account_id: account_id.to_string(),
        payee_id: Some(payee.0.to_string()),
        payee_name: Some(payee.1.to_string()),
        category_id: category.map(|c| c.0.to_string()),
        category_name: category.map(|c| c.1.to_string()),
        import_id: None,
        deleted: false,
    }
}

/// A small household budget used by tests and `--mock` runs
fn fixtures() -> MockLedger {
    let mut old_brokerage = account("acct-brokerage", "Old Brokerage", "otherAsset", 0, 0);
    old_brokerage.deleted = true;
    let mut mortgage = account("acct-mortgage", "Mortgage", "mortgage", -250_000_000, 0);
    mortgage.on_budget = false;

    let mut stash = category("cat-stash", "Secret Stash");
    stash.hidden = true;
    let mut old_phone = category("cat-phone", "Landline");
    old_phone.deleted = true;

    let mut transfer = payee("payee-transfer-checking", "Transfer : Everyday Checking");
    transfer.transfer_account_id = Some("acct-checking".to_string());
    let mut video = payee("payee-video", "Old Video Store");
    video.deleted = true;

    let mut deleted_tx = transaction(
        "tx-voided",
        "acct-visa",
        "2024-02-10",
        -1_000,
        ("payee-coffee-shop", "Coffee Shop"),
        None,
        ClearedStatus::Uncleared,
    );
    deleted_tx.deleted = true;

    MockLedger {
        budget: Some(Budget {
            id: "budget-household".to_string(),
            name: "Household".to_string(),
            last_modified_on: Some("2024-03-15T10:00:00+00:00".to_string()),
            first_month: Some("2023-01-01".to_string()),
            last_month: Some("2024-03-01".to_string()),
        }),
        accounts: vec![
            account("acct-wallet", "Wallet", "cash", 40_000, 0),
            account("acct-visa", "Visa Signature", "creditCard", -1_200_000, -34_560),
            account("acct-checking", "Everyday Checking", "checking", 2_400_000, 100_000),
            mortgage,
            account("acct-savings", "Emergency Fund", "savings", 10_000_000, 0),
            old_brokerage,
            account("acct-amex", "amex Gold", "creditCard", -310_250, 0),
        ],
        category_groups: vec![
            CategoryGroup {
                id: "grp-bills".to_string(),
                name: "Bills".to_string(),
                hidden: false,
                deleted: false,
                categories: vec![category("cat-rent", "Rent"), category("cat-electric", "Electric"), old_phone],
            },
            CategoryGroup {
                id: "grp-everyday".to_string(),
                name: "Everyday".to_string(),
                hidden: false,
                deleted: false,
                categories: vec![
                    category("cat-groceries", "Groceries"),
                    category("cat-dining", "Dining Out"),
                    stash,
                ],
            },
            CategoryGroup {
                id: "grp-hidden".to_string(),
                name: "Hidden Categories".to_string(),
                hidden: true,
                deleted: false,
                categories: vec![category("cat-archived", "Archived")],
            },
            CategoryGroup {
                id: "grp-retired".to_string(),
                name: "Retired".to_string(),
                hidden: false,
                deleted: true,
                categories: vec![category("cat-retired", "Retired Goal")],
            },
        ],
        payees: vec![
            payee("payee-blue-bottle", "Blue Bottle Coffee"),
            payee("payee-coffee-shop", "Coffee Shop"),
            payee("payee-whole-foods", "Whole Foods Market"),
            payee("payee-shell", "Shell"),
            payee("payee-netflix", "Netflix"),
            transfer,
            video,
        ],
        transactions: vec![
            transaction(
                "tx-netflix",
                "acct-visa",
                "2024-01-15",
                -15_990,
                ("payee-netflix", "Netflix"),
                None,
                ClearedStatus::Reconciled,
            ),
            transaction(
                "tx-rent",
                "acct-checking",
                "2024-02-01",
                -1_800_000,
                ("payee-landlord", "Landlord"),
                Some(("cat-rent", "Rent")),
                ClearedStatus::Cleared,
            ),
            deleted_tx,
            transaction(
                "tx-grocery",
                "acct-visa",
                "2024-02-20",
                -85_420,
                ("payee-whole-foods", "Whole Foods Market"),
                Some(("cat-groceries", "Groceries")),
                ClearedStatus::Uncleared,
            ),
            transaction(
                "tx-coffee",
                "acct-visa",
                "2024-02-22",
                -5_750,
                ("payee-blue-bottle", "Blue Bottle Coffee"),
                Some(("cat-dining", "Dining Out")),
                ClearedStatus::Cleared,
            ),
            transaction(
                "tx-payment",
                "acct-visa",
                "2024-02-25",
                500_000,
                ("payee-transfer-checking", "Transfer : Everyday Checking"),
                None,
                ClearedStatus::Cleared,
            ),
        ],
        next_id: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tx(account_id: &str, amount: Milliunits, import_id: Option<&str>) -> NewTransaction {
        NewTransaction {
            account_id: account_id.to_string(),
            date: "2024-03-01".to_string(),
            amount,
            payee_name: "Corner Bakery".to_string(),
            category_id: None,
            memo: None,
            cleared: ClearedStatus::Cleared,
            approved: true,
            import_id: import_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_unknown_budget_is_not_found() {
        let mock = MockBackend::with_fixtures();
        let err = mock.list_accounts("budget-other").await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::NotFound(_))));
        assert!(mock.list_accounts(LAST_USED_BUDGET).await.is_ok());
        assert!(mock.list_accounts("budget-household").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_updates_balances_and_payees() {
        let mock = MockBackend::with_fixtures();
        let before = mock.get_account(LAST_USED_BUDGET, "acct-visa").await.unwrap();

        mock.create_transaction(LAST_USED_BUDGET, new_tx("acct-visa", -10_000, None))
            .await
            .unwrap();

        let after = mock.get_account(LAST_USED_BUDGET, "acct-visa").await.unwrap();
        assert_eq!(after.cleared_balance, before.cleared_balance - 10_000);
        assert_eq!(after.uncleared_balance, before.uncleared_balance);
        assert_eq!(after.balance, before.balance - 10_000);

        let payees = mock.list_payees(LAST_USED_BUDGET).await.unwrap();
        assert!(payees.iter().any(|p| p.name == "Corner Bakery"));
    }

    #[tokio::test]
    async fn test_batch_skips_duplicate_import_ids() {
        let mock = MockBackend::with_fixtures();
        mock.create_transaction(LAST_USED_BUDGET, new_tx("acct-visa", -1_000, Some("imp-1")))
            .await
            .unwrap();

        let response = mock
            .create_transactions(
                LAST_USED_BUDGET,
                vec![
                    new_tx("acct-visa", -2_000, Some("imp-2")),
                    new_tx("acct-visa", -1_000, Some("imp-1")),
                    new_tx("acct-visa", -3_000, Some("imp-2")),
                    new_tx("acct-visa", -4_000, None),
                ],
            )
            .await
            .unwrap();

        let created = response.transactions.unwrap();
        let amounts: Vec<Milliunits> = created.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![-2_000, -4_000]);
        assert_eq!(response.duplicate_import_ids, vec!["imp-1", "imp-2"]);
        assert_eq!(response.transaction_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_with_unknown_account_creates_nothing() {
        let mock = MockBackend::with_fixtures();
        let before = mock.snapshot().unwrap().transactions.len();

        let result = mock
            .create_transactions(
                LAST_USED_BUDGET,
                vec![new_tx("acct-visa", -2_000, None), new_tx("acct-missing", -1, None)],
            )
            .await;
        assert!(result.is_err());
        assert_eq!(mock.snapshot().unwrap().transactions.len(), before);
    }

    #[tokio::test]
    async fn test_batch_with_unknown_category_creates_nothing() {
        let mock = MockBackend::with_fixtures();
        let before = mock.snapshot().unwrap();
        let mut bad = new_tx("acct-visa", -1_000, Some("imp-bad"));
        bad.category_id = Some("cat-missing".to_string());
        let mut good = new_tx("acct-visa", -2_000, Some("imp-good"));
        good.payee_name = "Brand New Payee".to_string();

        let err = mock
            .create_transactions(LAST_USED_BUDGET, vec![good, bad])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::ValidationFailed(_))));

        let after = mock.snapshot().unwrap();
        assert_eq!(after.transactions.len(), before.transactions.len());
        assert_eq!(after.payees.len(), before.payees.len());
        let visa = |l: &MockLedger| {
            l.accounts
                .iter()
                .find(|a| a.id == "acct-visa")
                .map(|a| (a.balance, a.cleared_balance))
        };
        assert_eq!(visa(&after), visa(&before));

        // The good row can still be submitted on its own
        let response = mock
            .create_transactions(
                LAST_USED_BUDGET,
                vec![new_tx("acct-visa", -2_000, Some("imp-good"))],
            )
            .await
            .unwrap();
        assert!(response.duplicate_import_ids.is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_amount_between_cleared_and_uncleared() {
        let mock = MockBackend::with_fixtures();
        let before = mock.get_account(LAST_USED_BUDGET, "acct-visa").await.unwrap();

        let updated = mock
            .update_transaction(
                LAST_USED_BUDGET,
                "tx-grocery",
                TransactionUpdate {
                    cleared: Some(ClearedStatus::Cleared),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.cleared, ClearedStatus::Cleared);

        let after = mock.get_account(LAST_USED_BUDGET, "acct-visa").await.unwrap();
        assert_eq!(after.cleared_balance, before.cleared_balance - 85_420);
        assert_eq!(after.uncleared_balance, before.uncleared_balance + 85_420);
        assert_eq!(after.balance, before.balance);
    }

    #[tokio::test]
    async fn test_update_unknown_category_rejected() {
        let mock = MockBackend::with_fixtures();
        let err = mock
            .update_transaction(
                LAST_USED_BUDGET,
                "tx-grocery",
                TransactionUpdate {
                    category_id: Some("cat-nope".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn test_since_date_filter_and_order() {
        let mock = MockBackend::with_fixtures();
        let txs = mock
            .list_account_transactions(LAST_USED_BUDGET, "acct-visa", Some("2024-02-20"))
            .await
            .unwrap();
        let ids: Vec<&str> = txs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tx-grocery", "tx-coffee", "tx-payment"]);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mock = MockBackend::with_fixtures();
        mock.fail_with(ApiError::RateLimited(ErrorDetail::default()));
        assert!(mock.list_budgets().await.is_err());
        mock.clear_failure();
        assert!(mock.list_budgets().await.is_ok());
    }
}
