//! Swap quotes.
//!
//! A quote is valid only until the next quote request replaces it. Swaps are
//! always executed against the most recent quote of the session.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;
use crate::{AssetId, Result, TempoPilotError};

/// A price quote for selling `amount_in` of `asset_in` for `asset_out`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    /// Input amount in whole token units.
    pub amount_in: Decimal,
    /// Quoted output amount in whole token units.
    pub amount_out: Decimal,
    /// Input amount in token base units (what the swap commits).
    pub amount_in_units: u128,
    /// Quoted output amount in token base units.
    pub amount_out_units: u128,
    pub quoted_at: DateTime<Utc>,
}

impl Quote {
    /// Build a quote from base-unit amounts.
    ///
    /// # Errors
    /// Returns [`TempoPilotError::InvalidQuote`] if either amount is zero or
    /// does not fit a decimal.
    pub fn from_units(
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in_units: u128,
        amount_out_units: u128,
        decimals: u32,
    ) -> Result<Self> {
        if amount_in_units == 0 || amount_out_units == 0 {
            return Err(TempoPilotError::InvalidQuote {
                reason: format!(
                    "amounts must be positive (in={amount_in_units}, out={amount_out_units})"
                ),
            });
        }
        let to_decimal = |units| {
            money::token_units_to_decimal(units, decimals).ok_or_else(|| {
                TempoPilotError::InvalidQuote {
                    reason: format!("{units} base units out of range"),
                }
            })
        };
        Ok(Self {
            amount_in: to_decimal(amount_in_units)?,
            amount_out: to_decimal(amount_out_units)?,
            asset_in,
            asset_out,
            amount_in_units,
            amount_out_units,
            quoted_at: Utc::now(),
        })
    }

    /// `amount_out / amount_in`, or `None` if the ratio does not fit a
    /// decimal (or `amount_in` is zero on a hand-built quote).
    #[must_use]
    pub fn implied_price(&self) -> Option<Decimal> {
        self.amount_out.checked_div(self.amount_in)
    }

    /// Whether this quote describes a swap of `asset_in` for `asset_out`.
    #[must_use]
    pub fn covers(&self, asset_in: &AssetId, asset_out: &AssetId) -> bool {
        self.asset_in == *asset_in && self.asset_out == *asset_out
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {:.4}", self.amount_in, self.amount_out)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Quote {
    /// Quote of `amount_in` whole units at `price`, with 6-decimal tokens.
    pub fn dummy(amount_in: i64, price: Decimal) -> Self {
        let amount_in = Decimal::from(amount_in);
        let amount_out = amount_in * price;
        Self {
            asset_in: AssetId::alpha_usd(),
            asset_out: AssetId::beta_usd(),
            amount_in,
            amount_out,
            amount_in_units: money::decimal_to_token_units(amount_in, 6).unwrap_or_default(),
            amount_out_units: money::decimal_to_token_units(amount_out, 6).unwrap_or_default(),
            quoted_at: Utc::now(),
        }
    }
}
