//! Reconciliation: compare the ledger's cleared balance with a statement

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::milliunits::{checked_to_milliunits, format_currency, to_major, Milliunits};

/// Differences strictly below one cent (10 milliunits) count as a match
pub const TOLERANCE_MILLIUNITS: Milliunits = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    Matched,
    Discrepancy,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Discrepancy => "discrepancy",
        }
    }
}

impl std::fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct ReconciliationResult {
    pub account_name: String,
    pub ynab_cleared_balance: f64,
    pub ynab_cleared_balance_formatted: String,
    pub actual_balance: f64,
    pub actual_balance_formatted: String,
    /// Ledger minus actual; positive when the ledger is higher
    pub difference: f64,
    pub difference_formatted: String,
    pub status: ReconciliationStatus,
    pub message: String,
}

/// Compare a cleared balance (milliunits) against a statement balance
///
/// The comparison runs on integer milliunits so a difference of exactly
/// one cent is reliably a discrepancy. Statement balances that are not
/// finite or not representable in milliunits are rejected.
pub fn compare(
    account_name: &str,
    cleared_balance: Milliunits,
    actual_balance: f64,
) -> Result<ReconciliationResult> {
    let actual = checked_to_milliunits(actual_balance).ok_or_else(|| {
        Error::InvalidData(format!("actual_balance is out of range: {}", actual_balance))
    })?;
    let difference = cleared_balance
        .checked_sub(actual)
        .filter(|d| d.checked_abs().is_some())
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "difference between cleared balance {} and actual balance {} is out of range",
                cleared_balance, actual_balance
            ))
        })?;

    let status = if difference.abs() < TOLERANCE_MILLIUNITS {
        ReconciliationStatus::Matched
    } else {
        ReconciliationStatus::Discrepancy
    };

    let message = match status {
        ReconciliationStatus::Matched => format!(
            "Account \"{}\" is balanced! YNAB cleared balance matches the actual balance.",
            account_name
        ),
        ReconciliationStatus::Discrepancy => {
            let direction = if difference > 0 { "higher" } else { "lower" };
            format!(
                "Discrepancy found: YNAB cleared balance is {} {} than the actual balance. \
                 This may indicate missing or extra transactions in YNAB.",
                format_currency(difference.abs()),
                direction
            )
        }
    };

    Ok(ReconciliationResult {
        account_name: account_name.to_string(),
        ynab_cleared_balance: to_major(cleared_balance),
        ynab_cleared_balance_formatted: format_currency(cleared_balance),
        actual_balance,
        actual_balance_formatted: format_currency(actual),
        difference: to_major(difference),
        difference_formatted: format_currency(difference),
        status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched() {
        let result = compare("Checking", 100_000, 100.00).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Matched);
        assert_eq!(result.difference, 0.0);
        assert!(result.message.contains("\"Checking\" is balanced"));
    }

    #[test]
    fn test_ledger_higher() {
        let result = compare("Checking", 100_000, 95.00).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Discrepancy);
        assert_eq!(result.difference, 5.0);
        assert_eq!(result.difference_formatted, "$5.00");
        assert!(result.message.contains("$5.00 higher"));
    }

    #[test]
    fn test_ledger_lower() {
        let result = compare("Visa", -1_234_560, -1200.00).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Discrepancy);
        assert_eq!(result.difference, -34.56);
        assert_eq!(result.difference_formatted, "-$34.56");
        assert!(result.message.contains("$34.56 lower"));
        assert_eq!(result.ynab_cleared_balance_formatted, "-$1,234.56");
        assert_eq!(result.actual_balance_formatted, "-$1,200.00");
    }

    #[test]
    fn test_one_cent_is_discrepancy() {
        let result = compare("Checking", 100_010, 100.00).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Discrepancy);
        assert_eq!(result.difference, 0.01);
        assert!(result.message.contains("$0.01 higher"));

        let result = compare("Checking", 100_000, 100.01).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Discrepancy);
        assert!(result.message.contains("$0.01 lower"));
    }

    #[test]
    fn test_sub_cent_is_matched() {
        let result = compare("Checking", 100_009, 100.00).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Matched);

        let result = compare("Checking", 100_000, 99.995).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Matched);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let result = compare("Checking", 0, 1.0).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "discrepancy");
        assert_eq!(result.status.to_string(), "discrepancy");
    }

    #[test]
    fn test_out_of_range_actual_balance_is_rejected() {
        for actual in [1e20, -1e20, f64::NAN, f64::INFINITY] {
            let err = compare("Visa", -1_200_000, actual).unwrap_err();
            assert!(matches!(err, Error::InvalidData(_)), "{} gave {:?}", actual, err);
        }
    }

    #[test]
    fn test_extreme_cleared_balance_does_not_overflow() {
        let err = compare("Visa", i64::MIN, 1_000_000.0).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let result = compare("Visa", i64::MAX, 0.0).unwrap();
        assert_eq!(result.status, ReconciliationStatus::Discrepancy);
    }
}
