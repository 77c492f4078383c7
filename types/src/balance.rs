//! Decimal balance type.
//!
//! Stakes, scores and estimated returns are arbitrary-precision decimals, never
//! floating point: ranking ties and stake conservation depend on exact
//! arithmetic. The backing type is [`rust_decimal::Decimal`], a 96-bit
//! mantissa with at most 28 fractional digits. Quotients are rounded to the
//! largest scale that still fits the mantissa.

use std::str::FromStr;

use crate::TypesError;

/// A stake, score or return value.
pub type Balance = rust_decimal::Decimal;

/// Maximum number of fractional digits carried by a [`Balance`].
pub const MAX_SCALE: u32 = 28;

/// Parse a balance from its decimal string form (e.g. `"1250000000"`, `"0.25"`).
pub fn parse_balance(raw: &str) -> Result<Balance, TypesError> {
    Balance::from_str(raw.trim()).map_err(|e| TypesError::InvalidBalance {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// `numerator / denominator`, clamped to [`Balance::MAX`] / [`Balance::MIN`]
/// when the quotient does not fit, or when `denominator` is zero.
pub fn saturating_div(numerator: Balance, denominator: Balance) -> Balance {
    numerator.checked_div(denominator).unwrap_or_else(|| {
        if numerator.is_sign_negative() != denominator.is_sign_negative() {
            Balance::MIN
        } else {
            Balance::MAX
        }
    })
}
