//! Money conversions between decimal strings, integer minor units, and token
//! base units.
//!
//! The ledger never does floating point currency arithmetic: amounts enter as
//! decimal strings, are rounded once to whole minor units (cents), and stay
//! integers from then on.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{CURRENCY_DECIMALS, MINOR_UNITS_PER_MAJOR};

/// Signed amount in minor currency units (cents).
pub type MinorUnits = i64;

/// Parse a decimal amount and round it to the nearest minor unit
/// (half away from zero).
///
/// Returns `None` for non-numeric or out-of-range input. Callers treat `None`
/// and `Some(0)` alike: there is nothing to do.
#[must_use]
pub fn to_minor_units(value: &str) -> Option<MinorUnits> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()?;
    parsed
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Format minor units as a decimal string with exactly two places.
#[must_use]
pub fn to_decimal_string(minor_units: MinorUnits) -> String {
    format!("{:.2}", Decimal::new(minor_units, CURRENCY_DECIMALS))
}

/// Convert minor units (cents) to token base units with `decimals` places.
///
/// Returns `None` for negative amounts or on overflow.
#[must_use]
pub fn to_token_units(minor_units: MinorUnits, decimals: u32) -> Option<u128> {
    let cents = u128::try_from(minor_units).ok()?;
    let scale = 10u128.checked_pow(decimals)?;
    cents.checked_mul(scale).map(|v| v / 100)
}

/// Convert a positive decimal amount to token base units, truncating any
/// precision beyond `decimals`.
#[must_use]
pub fn decimal_to_token_units(amount: Decimal, decimals: u32) -> Option<u128> {
    if amount.is_sign_negative() {
        return None;
    }
    let scale = Decimal::from(10u64.checked_pow(decimals)?);
    amount.checked_mul(scale)?.trunc().to_u128()
}

/// Convert token base units back to a decimal amount.
#[must_use]
pub fn token_units_to_decimal(units: u128, decimals: u32) -> Option<Decimal> {
    let raw = i128::try_from(units).ok()?;
    Decimal::try_from_i128_with_scale(raw, decimals).ok()
}
