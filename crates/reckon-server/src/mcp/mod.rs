//! MCP (Model Context Protocol) Server for Reckon
//!
//! Exposes a YNAB budget to LLMs as tools for statement reconciliation:
//! look up accounts and payees, enter missing transactions, clear what the
//! statement confirms and compare the cleared balance against the statement.
//!
//! # Transports
//!
//! - stdio (default): for desktop MCP clients that spawn `reckon serve`
//! - Streamable HTTP at `/mcp`: `reckon serve --http --port 3001`
//!
//! # Available Tools
//!
//! - `list_budgets`, `list_accounts`, `get_account_balance`
//! - `list_categories`, `list_payees`, `search_payees`
//! - `create_transaction`, `create_transactions_batch`
//! - `get_uncleared_transactions`, `get_cleared_transactions`
//! - `clear_transaction`, `update_transaction`
//! - `reconciliation_check`
//!
//! Ledger and validation failures never surface as protocol errors: they
//! come back as tool results with `is_error` set and an
//! `Error <action>: <message>` text.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use reckon_core::tools::{
    self, AccountParams, BudgetParams, ClearTransactionParams, ClearedTransactionsParams,
    CreateTransactionParams, CreateTransactionsBatchParams, ReconciliationCheckParams,
    SearchPayeesParams, UpdateTransactionParams,
};
use reckon_core::{Ledger, LedgerBackend};

/// Reckon MCP Server state
#[derive(Clone)]
pub struct ReckonMcpServer {
    /// Ledger client shared by all sessions (read-only after startup)
    ledger: Arc<Ledger>,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl ReckonMcpServer {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            tool_router: Self::tool_router(),
        }
    }
}

/// Render a handler outcome as a tool result
///
/// Success is pretty JSON text; failure is an error-flagged
/// `Error <action>: <message>` text.
fn tool_result<T: Serialize>(
    action: &str,
    result: reckon_core::Result<T>,
) -> Result<CallToolResult, McpError> {
    let failure = |message: String| -> Result<CallToolResult, McpError> {
        warn!(action, error = %message, "Tool call failed");
        Ok(CallToolResult::error(vec![Content::text(format!(
            "Error {}: {}",
            action, message
        ))]))
    };

    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                debug!(action, "Tool call succeeded");
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => failure(e.to_string()),
        },
        Err(e) => failure(e.to_string()),
    }
}

#[tool_handler]
impl ServerHandler for ReckonMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "reckon".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Reckon YNAB Reconciliation".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Reckon connects to a YNAB budget. Amounts are in dollars (negative for charges). \
                 To reconcile an account: check the balance against the statement with \
                 reconciliation_check, review get_uncleared_transactions, enter missing charges \
                 with create_transactions_batch, clear confirmed ones with clear_transaction, \
                 then check again."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl ReckonMcpServer {
    #[tool(
        description = "List all budgets for the authenticated YNAB user. Use this to find budget IDs for other operations."
    )]
    pub async fn list_budgets(&self) -> Result<CallToolResult, McpError> {
        tool_result("listing budgets", tools::list_budgets(&self.ledger).await)
    }

    #[tool(
        description = "List all accounts with their balances. Returns credit cards and checking accounts first. Balances are shown in dollars."
    )]
    pub async fn list_accounts(
        &self,
        Parameters(params): Parameters<BudgetParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "listing accounts",
            tools::list_accounts(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Get detailed balance information for a specific account including cleared, uncleared, and total balances in dollars."
    )]
    pub async fn get_account_balance(
        &self,
        Parameters(params): Parameters<AccountParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "getting account balance",
            tools::get_account_balance(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "List all category groups and their categories. Useful for categorizing new transactions."
    )]
    pub async fn list_categories(
        &self,
        Parameters(params): Parameters<BudgetParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "listing categories",
            tools::list_categories(&self.ledger, params).await,
        )
    }

    #[tool(description = "List all payees in the budget.")]
    pub async fn list_payees(
        &self,
        Parameters(params): Parameters<BudgetParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result("listing payees", tools::list_payees(&self.ledger, params).await)
    }

    #[tool(
        description = "Fuzzy search for payees by name. Returns up to 10 best matches with relevance scores."
    )]
    pub async fn search_payees(
        &self,
        Parameters(params): Parameters<SearchPayeesParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "searching payees",
            tools::search_payees(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Create a single transaction. Amounts are in dollars (negative for charges, positive for credits). Defaults to cleared status for reconciliation workflow."
    )]
    pub async fn create_transaction(
        &self,
        Parameters(params): Parameters<CreateTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "creating transaction",
            tools::create_transaction(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Create multiple transactions at once. All transactions go to the same account. Amounts are in dollars. Ideal for bulk reconciliation from credit card statements."
    )]
    pub async fn create_transactions_batch(
        &self,
        Parameters(params): Parameters<CreateTransactionsBatchParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "creating transactions",
            tools::create_transactions_batch(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Get all uncleared transactions for an account. Useful for seeing what might need to be cleared during reconciliation."
    )]
    pub async fn get_uncleared_transactions(
        &self,
        Parameters(params): Parameters<AccountParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "getting uncleared transactions",
            tools::get_uncleared_transactions(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Get all cleared transactions for an account. Useful for reconciliation to compare against statement."
    )]
    pub async fn get_cleared_transactions(
        &self,
        Parameters(params): Parameters<ClearedTransactionsParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "getting cleared transactions",
            tools::get_cleared_transactions(&self.ledger, params).await,
        )
    }

    #[tool(description = "Mark a transaction as cleared.")]
    pub async fn clear_transaction(
        &self,
        Parameters(params): Parameters<ClearTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "clearing transaction",
            tools::clear_transaction(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Update an existing transaction. Can modify amount, date, payee, category, memo, or cleared status."
    )]
    pub async fn update_transaction(
        &self,
        Parameters(params): Parameters<UpdateTransactionParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "updating transaction",
            tools::update_transaction(&self.ledger, params).await,
        )
    }

    #[tool(
        description = "Compare YNAB cleared balance to actual balance from your bank/card statement. Reports if they match or shows the discrepancy."
    )]
    pub async fn reconciliation_check(
        &self,
        Parameters(params): Parameters<ReconciliationCheckParams>,
    ) -> Result<CallToolResult, McpError> {
        tool_result(
            "checking reconciliation",
            tools::reconciliation_check(&self.ledger, params).await,
        )
    }
}

/// Serve MCP over stdin/stdout until the client disconnects
pub async fn serve_stdio(ledger: Ledger) -> anyhow::Result<()> {
    info!(backend = ledger.client().name(), "Starting MCP server on stdio");

    let service = ReckonMcpServer::new(Arc::new(ledger))
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    info!("MCP client disconnected");
    Ok(())
}

/// Start the MCP server over Streamable HTTP on the given address
pub async fn start_mcp_server(ledger: Ledger, host: &str, port: u16) -> anyhow::Result<()> {
    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let router = crate::create_router(Arc::new(ledger));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
