//! Milliunit conversion and currency formatting
//!
//! YNAB stores every amount as an integer number of milliunits, where
//! 1000 milliunits = 1.00 in the budget's currency. Charges are negative,
//! payments and credits are positive.

/// Amount in milliunits (1000 = 1.00)
pub type Milliunits = i64;

pub const MILLIUNITS_PER_UNIT: i64 = 1000;

/// Largest magnitude accepted from callers: one trillion in the budget's currency
pub const MAX_MILLIUNITS: Milliunits = 1_000_000_000_000_000;

/// Convert a decimal amount (e.g. -25.99) to milliunits (-25990)
///
/// Rounds to the nearest milliunit, half away from zero, so `0.0625`
/// becomes `63` and `-0.0625` becomes `-63`.
pub fn to_milliunits(amount: f64) -> Milliunits {
    (amount * MILLIUNITS_PER_UNIT as f64).round() as Milliunits
}

/// Like [`to_milliunits`], but `None` for NaN, infinities and amounts
/// whose magnitude exceeds [`MAX_MILLIUNITS`]
///
/// Sums and differences of two checked amounts always fit in an `i64`.
pub fn checked_to_milliunits(amount: f64) -> Option<Milliunits> {
    if !amount.is_finite() {
        return None;
    }
    let scaled = (amount * MILLIUNITS_PER_UNIT as f64).round();
    if scaled.abs() > MAX_MILLIUNITS as f64 {
        return None;
    }
    Some(scaled as Milliunits)
}

/// Convert milliunits to a decimal amount (exact division)
pub fn to_major(milliunits: Milliunits) -> f64 {
    milliunits as f64 / MILLIUNITS_PER_UNIT as f64
}

/// Format milliunits as a dollar string: `$1,234.56` or `-$25.99`
///
/// The absolute value is rounded to cents (half away from zero) and the
/// minus sign goes in front of the symbol.
pub fn format_currency(milliunits: Milliunits) -> String {
    let magnitude = milliunits.unsigned_abs();
    let cents = (magnitude + 5) / 10;
    let whole = cents / 100;
    let fraction = cents % 100;

    let sign = if milliunits < 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(whole), fraction)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
