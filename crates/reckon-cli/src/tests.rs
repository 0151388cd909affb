//! CLI command tests
//!
//! Argument parsing plus the direct commands run against the sample ledger.

use clap::Parser;
use reckon_core::Ledger;

use crate::cli::{Cli, Commands};
use crate::commands::{self, to_json};

// ========== Argument Parsing Tests ==========

#[test]
fn test_serve_defaults_to_stdio() {
    let cli = Cli::try_parse_from(["reckon", "serve"]).unwrap();
    assert!(!cli.verbose);
    assert!(!cli.mock);
    match cli.command {
        Commands::Serve { http, host, port } => {
            assert!(!http);
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 3001);
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_serve_http_with_address() {
    let cli =
        Cli::try_parse_from(["reckon", "serve", "--http", "--host", "0.0.0.0", "-p", "8080"])
            .unwrap();
    match cli.command {
        Commands::Serve { http, host, port } => {
            assert!(http);
            assert_eq!(host, "0.0.0.0");
            assert_eq!(port, 8080);
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["reckon", "budgets", "--mock", "-v"]).unwrap();
    assert!(cli.mock);
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Budgets));
}

#[test]
fn test_reconcile_accepts_negative_balance() {
    let cli = Cli::try_parse_from([
        "reckon",
        "reconcile",
        "--account",
        "acct-visa",
        "--balance",
        "-1262.49",
        "--budget",
        "budget-household",
    ])
    .unwrap();
    match cli.command {
        Commands::Reconcile {
            account,
            balance,
            budget,
        } => {
            assert_eq!(account, "acct-visa");
            assert_eq!(balance, -1262.49);
            assert_eq!(budget.as_deref(), Some("budget-household"));
        }
        _ => panic!("expected reconcile"),
    }
}

#[test]
fn test_reconcile_requires_balance() {
    assert!(Cli::try_parse_from(["reckon", "reconcile", "--account", "acct-visa"]).is_err());
}

#[test]
fn test_payees_positional_query() {
    let cli = Cli::try_parse_from(["reckon", "payees", "coffee"]).unwrap();
    match cli.command {
        Commands::Payees { query, budget } => {
            assert_eq!(query, "coffee");
            assert!(budget.is_none());
        }
        _ => panic!("expected payees"),
    }
}

#[test]
fn test_uncleared_requires_account() {
    assert!(Cli::try_parse_from(["reckon", "uncleared"]).is_err());
}

#[test]
fn test_unknown_subcommand_rejected() {
    assert!(Cli::try_parse_from(["reckon", "import"]).is_err());
}

// ========== Command Tests ==========

#[test]
fn test_open_ledger_mock() {
    let ledger = commands::open_ledger(true).unwrap();
    assert_eq!(
        reckon_core::LedgerBackend::name(ledger.client()),
        "mock"
    );
}

#[test]
fn test_to_json_is_pretty() {
    let text = to_json(&serde_json::json!({ "status": "matched" })).unwrap();
    assert_eq!(text, "{\n  \"status\": \"matched\"\n}");
}

#[tokio::test]
async fn test_cmd_budgets_mock() {
    let ledger = Ledger::mock();
    assert!(commands::cmd_budgets(&ledger).await.is_ok());
}

#[tokio::test]
async fn test_cmd_accounts_mock() {
    let ledger = Ledger::mock();
    assert!(commands::cmd_accounts(&ledger, None).await.is_ok());
}

#[tokio::test]
async fn test_cmd_payees_mock() {
    let ledger = Ledger::mock();
    assert!(commands::cmd_payees(&ledger, "coffee".to_string(), None)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_cmd_reconcile_mock() {
    let ledger = Ledger::mock();
    let result =
        commands::cmd_reconcile(&ledger, "acct-visa".to_string(), -1262.49, None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_reconcile_unknown_account_fails() {
    let ledger = Ledger::mock();
    let err = commands::cmd_reconcile(&ledger, "acct-missing".to_string(), 0.0, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to check reconciliation"));
    assert!(format!("{:#}", err).contains("Account not found"));
}

#[tokio::test]
async fn test_cmd_uncleared_blank_account_fails() {
    let ledger = Ledger::mock();
    assert!(commands::cmd_uncleared(&ledger, "  ".to_string(), None)
        .await
        .is_err());
}
