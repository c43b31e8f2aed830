//! Session configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! expected_network_id = 42431
//!
//! [swap]
//! slippage_bps = 30
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::{AssetId, Result, TempoPilotError};

/// Configuration for one orchestration session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Network id the live executor must report.
    pub expected_network_id: u64,
    /// Asset used for payments and settlement legs.
    pub payment_asset: AssetId,
    /// Second asset reported by balance refreshes.
    pub secondary_asset: AssetId,
    /// Decimal places of the network's tokens.
    pub token_decimals: u32,
    /// Memo used when a payment has none.
    pub default_memo: String,
    /// Prefix for transaction links.
    pub explorer_base: String,
    /// Maximum audit entries retained.
    pub audit_capacity: usize,
    /// Swap defaults.
    pub swap: SwapDefaults,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expected_network_id: constants::EXPECTED_NETWORK_ID,
            payment_asset: AssetId::alpha_usd(),
            secondary_asset: AssetId::beta_usd(),
            token_decimals: constants::DEFAULT_TOKEN_DECIMALS,
            default_memo: constants::DEFAULT_PAYMENT_MEMO.to_string(),
            explorer_base: constants::DEFAULT_EXPLORER_BASE.to_string(),
            audit_capacity: constants::AUDIT_TRAIL_CAPACITY,
            swap: SwapDefaults::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`TempoPilotError::Configuration`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.audit_capacity == 0 {
            return Err(TempoPilotError::Configuration(
                "audit_capacity must be > 0".to_string(),
            ));
        }
        if self.token_decimals > constants::MAX_TOKEN_DECIMALS {
            return Err(TempoPilotError::Configuration(format!(
                "token_decimals {} exceeds {}",
                self.token_decimals,
                constants::MAX_TOKEN_DECIMALS
            )));
        }
        self.swap.validate()
    }
}

/// Default swap parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapDefaults {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    /// Amount quoted when a swap auto-fetches its quote.
    pub amount: Decimal,
    pub slippage_bps: u32,
    pub impact_tolerance_bps: u32,
}

impl Default for SwapDefaults {
    fn default() -> Self {
        Self {
            asset_in: AssetId::alpha_usd(),
            asset_out: AssetId::beta_usd(),
            amount: Decimal::from(constants::DEFAULT_SWAP_AMOUNT),
            slippage_bps: constants::DEFAULT_SLIPPAGE_BPS,
            impact_tolerance_bps: constants::DEFAULT_IMPACT_TOLERANCE_BPS,
        }
    }
}

impl SwapDefaults {
    fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(TempoPilotError::Configuration(format!(
                "swap.amount must be positive, got {}",
                self.amount
            )));
        }
        for (name, value) in [
            ("swap.slippage_bps", self.slippage_bps),
            ("swap.impact_tolerance_bps", self.impact_tolerance_bps),
        ] {
            if value > constants::BPS_DENOMINATOR {
                return Err(TempoPilotError::Configuration(format!(
                    "{name} {value} exceeds {}",
                    constants::BPS_DENOMINATOR
                )));
            }
        }
        Ok(())
    }
}
