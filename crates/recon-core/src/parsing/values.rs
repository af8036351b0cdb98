use crate::error::ReconError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\$?-?(\d{1,3}(,\d{3})+|\d+)\.\d{2}( ?(CR|DR))?$").expect("valid money regex")
});

/// True if a column holds a printed money amount such as `-$1,234.50` or
/// `812.00 CR`.
pub fn looks_like_money(s: &str) -> bool {
    MONEY.is_match(s.trim())
}

/// Parse a printed amount, keeping any leading minus sign.
///
/// Handles formats like:
/// - "1,234.50" -> 1234.50
/// - "$12.00" -> 12.00
/// - "-$12.00" or "$-12.00" -> -12.00
pub fn parse_money(s: &str) -> Result<Decimal, ReconError> {
    let trimmed = s.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let (negative, rest) = match rest.strip_prefix('-') {
        Some(inner) => (!negative, inner),
        None => (negative, rest),
    };

    let digits: String = rest.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return Err(ReconError::field("amount", format!("empty amount in '{s}'")));
    }
    let value = Decimal::from_str(&digits)
        .map_err(|e| ReconError::field("amount", format!("invalid amount '{s}': {e}")))?;
    Ok(if negative { -value } else { value })
}

/// Parse an amount that may carry a `CR` (positive) or `DR` (negative) suffix.
pub fn parse_balance(s: &str) -> Result<Decimal, ReconError> {
    let trimmed = s.trim();
    if let Some(rest) = trimmed.strip_suffix("DR") {
        return Ok(-parse_money(rest)?.abs());
    }
    if let Some(rest) = trimmed.strip_suffix("CR") {
        return Ok(parse_money(rest)?.abs());
    }
    parse_money(trimmed)
}

/// Parse a transaction count printed in a statement summary.
pub fn parse_count(s: &str) -> Result<usize, ReconError> {
    let s = s.trim();
    s.replace(',', "")
        .parse()
        .map_err(|e| ReconError::field("count", format!("invalid count '{s}': {e}")))
}
