//! YNAB REST backend
//!
//! Bearer-token HTTP client for the YNAB v1 API. Successful responses are
//! unwrapped from their `{"data": ...}` envelope; failures are classified into
//! [`ApiError`] from the status code and the `{"error": ...}` payload.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, Error, ErrorResponse, Result};
use crate::models::{
    Account, AccountData, AccountsData, Budget, BudgetsData, CategoriesData, CategoryGroup,
    Envelope, NewTransaction, Payee, PayeesData, SaveTransactionWrapper, SaveTransactionsResponse,
    SaveTransactionsWrapper, TransactionData, TransactionDetail, TransactionUpdate,
    TransactionsData, UpdateTransactionWrapper,
};

use super::LedgerBackend;

#[derive(Clone)]
pub struct HttpBackend {
    http_client: Client,
    base_url: String,
    access_token: String,
}

impl HttpBackend {
    /// Create a backend with a default reqwest client (no timeout)
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// Create a backend honoring the configured URL and timeout
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("reckon/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    /// Endpoint URL with each segment percent-encoded, so an id can never
    /// add path segments or a query string
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::Config(format!("Invalid YNAB API URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("YNAB API URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, method: &str, url: Url, request: RequestBuilder) -> Result<T> {
        let path = url.path();
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        debug!(method, path, status = status.as_u16(), "YNAB API response");

        let body = response.bytes().await?;
        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|r| r.error)
                .unwrap_or_default();
            let err = ApiError::from_status(status.as_u16(), detail);
            warn!(method, path, status = status.as_u16(), error = %err, "YNAB API request failed");
            return Err(err.into());
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let request = self.http_client.get(url.clone());
        self.execute("GET", url, request).await
    }
}

#[async_trait]
impl LedgerBackend for HttpBackend {
    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        let data: BudgetsData = self.get(&["budgets"]).await?;
        Ok(data.budgets)
    }

    async fn list_accounts(&self, budget_id: &str) -> Result<Vec<Account>> {
        let data: AccountsData = self.get(&["budgets", budget_id, "accounts"]).await?;
        Ok(data.accounts)
    }

    async fn get_account(&self, budget_id: &str, account_id: &str) -> Result<Account> {
        let data: AccountData = self
            .get(&["budgets", budget_id, "accounts", account_id])
            .await?;
        Ok(data.account)
    }

    async fn list_category_groups(&self, budget_id: &str) -> Result<Vec<CategoryGroup>> {
        let data: CategoriesData = self.get(&["budgets", budget_id, "categories"]).await?;
        Ok(data.category_groups)
    }

    async fn list_payees(&self, budget_id: &str) -> Result<Vec<Payee>> {
        let data: PayeesData = self.get(&["budgets", budget_id, "payees"]).await?;
        Ok(data.payees)
    }

    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: NewTransaction,
    ) -> Result<SaveTransactionsResponse> {
        let url = self.endpoint(&["budgets", budget_id, "transactions"])?;
        let request = self
            .http_client
            .post(url.clone())
            .json(&SaveTransactionWrapper { transaction });
        self.execute("POST", url, request).await
    }

    async fn create_transactions(
        &self,
        budget_id: &str,
        transactions: Vec<NewTransaction>,
    ) -> Result<SaveTransactionsResponse> {
        let url = self.endpoint(&["budgets", budget_id, "transactions"])?;
        let request = self
            .http_client
            .post(url.clone())
            .json(&SaveTransactionsWrapper { transactions });
        self.execute("POST", url, request).await
    }

    async fn list_account_transactions(
        &self,
        budget_id: &str,
        account_id: &str,
        since_date: Option<&str>,
    ) -> Result<Vec<TransactionDetail>> {
        let url = self.endpoint(&["budgets", budget_id, "accounts", account_id, "transactions"])?;
        let mut request = self.http_client.get(url.clone());
        if let Some(since) = since_date {
            request = request.query(&[("since_date", since)]);
        }
        let data: TransactionsData = self.execute("GET", url, request).await?;
        Ok(data.transactions)
    }

    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<TransactionDetail> {
        let url = self.endpoint(&["budgets", budget_id, "transactions", transaction_id])?;
        let request = self
            .http_client
            .put(url.clone())
            .json(&UpdateTransactionWrapper { transaction: update });
        let data: TransactionData = self.execute("PUT", url, request).await?;
        Ok(data.transaction)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockBackend;
    use crate::models::ClearedStatus;
    use crate::test_utils::{MockYnabServer, MOCK_TOKEN};

    fn backend_for(server: &MockYnabServer) -> HttpBackend {
        HttpBackend::new(&server.url(), MOCK_TOKEN)
    }

    #[tokio::test]
    async fn test_list_budgets_over_http() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = backend_for(&server);

        let budgets = backend.list_budgets().await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].name, "Household");
    }

    #[tokio::test]
    async fn test_get_account_over_http() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = backend_for(&server);

        let account = backend.get_account("last-used", "acct-visa").await.unwrap();
        assert_eq!(account.name, "Visa Signature");
        assert_eq!(account.account_type, "creditCard");
    }

    #[tokio::test]
    async fn test_not_found_is_classified() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = backend_for(&server);

        let err = backend.get_account("last-used", "nope").await.unwrap_err();
        match err {
            Error::Api(ApiError::NotFound(detail)) => {
                assert_eq!(detail.name.as_deref(), Some("resource_not_found"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ids_are_escaped_as_single_path_segments() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = backend_for(&server);

        // Must reach the single-account route, not the transactions listing
        let err = backend
            .get_account("last-used", "acct-visa/transactions")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::NotFound(_))), "got {:?}", err);

        let err = backend
            .get_account("last-used", "acct-visa?x=1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::NotFound(_))), "got {:?}", err);
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let backend = HttpBackend::new("https://api.ynab.com/v1/", MOCK_TOKEN);
        let url = backend
            .endpoint(&["budgets", "last-used", "accounts", "a/b?c#d"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.ynab.com/v1/budgets/last-used/accounts/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_endpoint_rejects_invalid_base_url() {
        let backend = HttpBackend::new("not a url", MOCK_TOKEN);
        assert!(matches!(backend.endpoint(&["budgets"]), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = HttpBackend::new(&server.url(), "wrong-token");

        let err = backend.list_budgets().await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Unauthorized(_))));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_create_and_list_over_http() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = backend_for(&server);

        let response = backend
            .create_transaction(
                "last-used",
                NewTransaction {
                    account_id: "acct-visa".into(),
                    date: "2024-03-01".into(),
                    amount: -12_340,
                    payee_name: "Corner Bakery".into(),
                    category_id: None,
                    memo: Some("croissants".into()),
                    cleared: ClearedStatus::Cleared,
                    approved: true,
                    import_id: None,
                },
            )
            .await
            .unwrap();
        let created = response.transaction.unwrap();
        assert_eq!(created.amount, -12_340);
        assert_eq!(created.payee_name.as_deref(), Some("Corner Bakery"));

        let listed = backend
            .list_account_transactions("last-used", "acct-visa", Some("2024-03-01"))
            .await
            .unwrap();
        assert!(listed.iter().any(|t| t.id == created.id));
        assert!(listed.iter().all(|t| t.date.as_str() >= "2024-03-01"));
    }

    #[tokio::test]
    async fn test_update_over_http() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let backend = backend_for(&server);

        let updated = backend
            .update_transaction(
                "last-used",
                "tx-grocery",
                TransactionUpdate {
                    cleared: Some(ClearedStatus::Cleared),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.cleared, ClearedStatus::Cleared);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is not listening
        let backend = HttpBackend::new("http://127.0.0.1:9", MOCK_TOKEN);
        let err = backend.list_budgets().await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Transport(_))));
    }
}
