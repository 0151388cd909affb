//! Test utilities for reckon-core
//!
//! This module provides a mock YNAB server backed by [`MockBackend`], so the
//! HTTP client can be exercised end to end against the real wire format.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::client::{LedgerBackend, MockBackend};
use crate::error::{ApiError, Error, ErrorDetail, ErrorResponse};
use crate::models::{
    AccountData, AccountsData, BudgetsData, CategoriesData, Envelope, NewTransaction, PayeesData,
    TransactionData, TransactionsData, UpdateTransactionWrapper,
};

/// Bearer token the mock server accepts
pub const MOCK_TOKEN: &str = "mock-ynab-token";

/// Mock YNAB server for testing and development
pub struct MockYnabServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockYnabServer {
    /// Start the mock server on an available port
    pub async fn start(backend: MockBackend) -> Self {
        let app = Router::new()
            .route("/budgets", get(handle_budgets))
            .route("/budgets/:budget_id/accounts", get(handle_accounts))
            .route("/budgets/:budget_id/accounts/:account_id", get(handle_account))
            .route(
                "/budgets/:budget_id/accounts/:account_id/transactions",
                get(handle_account_transactions),
            )
            .route("/budgets/:budget_id/categories", get(handle_categories))
            .route("/budgets/:budget_id/payees", get(handle_payees))
            .route("/budgets/:budget_id/transactions", post(handle_create))
            .route(
                "/budgets/:budget_id/transactions/:transaction_id",
                put(handle_update),
            )
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockYnabServer {
    fn drop(&mut self) {
        self.stop();
    }
}

type HandlerResult = std::result::Result<Response, Response>;

/// Reject requests without the mock bearer token
fn authorize(headers: &HeaderMap) -> std::result::Result<(), Response> {
    let expected = format!("Bearer {}", MOCK_TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == expected);

    if authorized {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorDetail::new("401", "unauthorized", "Unauthorized"),
        ))
    }
}

fn error_response(status: StatusCode, detail: ErrorDetail) -> Response {
    (status, Json(ErrorResponse { error: detail })).into_response()
}

/// Render a backend error the way the API would
fn api_failure(err: Error) -> Response {
    match err {
        Error::Api(api) => {
            let status = api
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let detail = api.detail().cloned().unwrap_or_default();
            error_response(status, detail)
        }
        other => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorDetail::new("500", "internal_server_error", &other.to_string()),
        ),
    }
}

fn data<T: Serialize>(status: StatusCode, data: T) -> HandlerResult {
    Ok((status, Json(Envelope { data })).into_response())
}

async fn handle_budgets(State(backend): State<MockBackend>, headers: HeaderMap) -> HandlerResult {
    authorize(&headers)?;
    let budgets = backend.list_budgets().await.map_err(api_failure)?;
    data(StatusCode::OK, BudgetsData { budgets })
}

async fn handle_accounts(
    State(backend): State<MockBackend>,
    Path(budget_id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    authorize(&headers)?;
    let accounts = backend.list_accounts(&budget_id).await.map_err(api_failure)?;
    data(StatusCode::OK, AccountsData { accounts })
}

async fn handle_account(
    State(backend): State<MockBackend>,
    Path((budget_id, account_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> HandlerResult {
    authorize(&headers)?;
    let account = backend
        .get_account(&budget_id, &account_id)
        .await
        .map_err(api_failure)?;
    data(StatusCode::OK, AccountData { account })
}

#[derive(Debug, Deserialize)]
struct SinceQuery {
    since_date: Option<String>,
}

async fn handle_account_transactions(
    State(backend): State<MockBackend>,
    Path((budget_id, account_id)): Path<(String, String)>,
    Query(query): Query<SinceQuery>,
    headers: HeaderMap,
) -> HandlerResult {
    authorize(&headers)?;
    let transactions = backend
        .list_account_transactions(&budget_id, &account_id, query.since_date.as_deref())
        .await
        .map_err(api_failure)?;
    data(StatusCode::OK, TransactionsData { transactions })
}

async fn handle_categories(
    State(backend): State<MockBackend>,
    Path(budget_id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    authorize(&headers)?;
    let category_groups = backend
        .list_category_groups(&budget_id)
        .await
        .map_err(api_failure)?;
    data(StatusCode::OK, CategoriesData { category_groups })
}

async fn handle_payees(
    State(backend): State<MockBackend>,
    Path(budget_id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    authorize(&headers)?;
    let payees = backend.list_payees(&budget_id).await.map_err(api_failure)?;
    data(StatusCode::OK, PayeesData { payees })
}

/// POST body: either a single `transaction` or a `transactions` batch
#[derive(Debug, Deserialize)]
struct SaveBody {
    transaction: Option<NewTransaction>,
    transactions: Option<Vec<NewTransaction>>,
}

async fn handle_create(
    State(backend): State<MockBackend>,
    Path(budget_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<SaveBody>,
) -> HandlerResult {
    authorize(&headers)?;
    let response = match (body.transaction, body.transactions) {
        (Some(single), None) => backend.create_transaction(&budget_id, single).await,
        (None, Some(batch)) => backend.create_transactions(&budget_id, batch).await,
        _ => Err(ApiError::ValidationFailed(ErrorDetail::new(
            "400",
            "bad_request",
            "Exactly one of transaction or transactions must be provided",
        ))
        .into()),
    }
    .map_err(api_failure)?;
    data(StatusCode::CREATED, response)
}

async fn handle_update(
    State(backend): State<MockBackend>,
    Path((budget_id, transaction_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<UpdateTransactionWrapper>,
) -> HandlerResult {
    authorize(&headers)?;
    let transaction = backend
        .update_transaction(&budget_id, &transaction_id, body.transaction)
        .await
        .map_err(api_failure)?;
    data(StatusCode::OK, TransactionData { transaction })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_requires_token() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let response = reqwest::get(format!("{}/budgets", server.url())).await.unwrap();
        assert_eq!(response.status().as_u16(), 401);

        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.error.name.as_deref(), Some("unauthorized"));
    }

    #[tokio::test]
    async fn test_mock_server_wraps_data_envelope() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let body: serde_json::Value = reqwest::Client::new()
            .get(format!("{}/budgets/last-used/payees", server.url()))
            .bearer_auth(MOCK_TOKEN)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert!(body["data"]["payees"].as_array().is_some_and(|p| !p.is_empty()));
    }

    #[tokio::test]
    async fn test_mock_server_rejects_ambiguous_create() {
        let server = MockYnabServer::start(MockBackend::with_fixtures()).await;
        let response = reqwest::Client::new()
            .post(format!("{}/budgets/last-used/transactions", server.url()))
            .bearer_auth(MOCK_TOKEN)
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_mock_server_stop() {
        let mut server = MockYnabServer::start(MockBackend::new()).await;
        let url = server.url();
        server.stop();
        // Stopping twice is harmless
        server.stop();
        assert!(url.starts_with("http://127.0.0.1:"));
    }
}
