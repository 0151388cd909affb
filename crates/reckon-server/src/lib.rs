//! Reckon Server
//!
//! MCP server exposing YNAB reconciliation tools, over stdio or Streamable
//! HTTP. The HTTP router also answers `/health` so a supervisor can probe it.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use reckon_core::{Ledger, LedgerBackend};

pub mod mcp;

pub use mcp::{serve_stdio, start_mcp_server, ReckonMcpServer};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Ledger backend in use ("http" or "mock")
    pub backend: String,
}

async fn health(State(ledger): State<Arc<Ledger>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend: ledger.client().name().to_string(),
    })
}

/// Build the HTTP router: MCP at `/mcp`, health probe at `/health`
pub fn create_router(ledger: Arc<Ledger>) -> Router {
    let mcp_ledger = ledger.clone();
    let service = StreamableHttpService::new(
        move || Ok(ReckonMcpServer::new(mcp_ledger.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", service)
        .layer(TraceLayer::new_for_http())
        .with_state(ledger)
}
