//! Results of orchestration attempts.
//!
//! Validation failures are returned as `Err`; everything that happens after
//! validation (commits, simulations, guard refusals, executor failures) is
//! one of these values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempopilot_types::constants::SIMULATED_BALANCE_MINOR;
use tempopilot_types::{AssetId, MinorUnits, Quote, SessionConfig, TxReference, money};

/// Outcome of a payment, settlement leg or swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Committed by the live executor.
    Committed { tx: TxReference },
    /// Completed in simulated mode with a synthetic reference.
    Simulated { tx: TxReference },
    /// Refused by the price guard before anything was submitted.
    GuardBlocked {
        impact_bps: Option<Decimal>,
        tolerance_bps: u32,
        reason: String,
    },
    /// The executor reported a failure.
    Failed { reason: String },
}

impl ExecutionOutcome {
    /// Committed or simulated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Committed { .. } | Self::Simulated { .. })
    }

    #[must_use]
    pub fn tx(&self) -> Option<&TxReference> {
        match self {
            Self::Committed { tx } | Self::Simulated { tx } => Some(tx),
            Self::GuardBlocked { .. } | Self::Failed { .. } => None,
        }
    }

    /// Explorer link for a committed transaction.
    #[must_use]
    pub fn explorer_url(&self, explorer_base: &str) -> Option<String> {
        match self {
            Self::Committed { tx } => tx.explorer_url(explorer_base),
            _ => None,
        }
    }
}

/// Outcome of a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Live { quote: Quote },
    Simulated { quote: Quote },
    Failed { reason: String },
}

/// Aggregate result of a settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSummary {
    /// Legs that committed (or were simulated).
    pub executed_count: usize,
    /// Legs the caller attempted that failed.
    pub failed_count: usize,
    /// Legs owed by someone other than the caller.
    pub skipped_count: usize,
    /// Caller's legs that already committed in an earlier run of this plan.
    pub already_settled_count: usize,
    /// Hex digest of the plan the legs belong to.
    pub plan_root: String,
}

/// Caller wallet balances of the two session assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalances {
    pub payment_asset: AssetId,
    pub payment: MinorUnits,
    pub secondary_asset: AssetId,
    pub secondary: MinorUnits,
}

impl WalletBalances {
    /// Fixed balances reported in simulated mode.
    #[must_use]
    pub fn simulated(config: &SessionConfig) -> Self {
        Self {
            payment_asset: config.payment_asset.clone(),
            payment: SIMULATED_BALANCE_MINOR,
            secondary_asset: config.secondary_asset.clone(),
            secondary: SIMULATED_BALANCE_MINOR,
        }
    }
}

impl std::fmt::Display for WalletBalances {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {}",
            money::to_decimal_string(self.payment),
            money::to_decimal_string(self.secondary)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_committed_outcomes_link_to_explorer() {
        let base = "https://explore.tempo.xyz/tx/";
        let committed = ExecutionOutcome::Committed {
            tx: TxReference::new("0xabc"),
        };
        let simulated = ExecutionOutcome::Simulated {
            tx: TxReference::synthetic(1),
        };
        assert_eq!(
            committed.explorer_url(base).as_deref(),
            Some("https://explore.tempo.xyz/tx/0xabc")
        );
        assert!(simulated.explorer_url(base).is_none());
        assert!(simulated.is_success());
        assert!(
            !ExecutionOutcome::Failed {
                reason: "nope".into()
            }
            .is_success()
        );
    }

    #[test]
    fn simulated_balances_display() {
        let balances = WalletBalances::simulated(&SessionConfig::default());
        assert_eq!(balances.to_string(), "1000000.00 / 1000000.00");
    }

    #[test]
    fn outcome_serializes_tagged() {
        let outcome = ExecutionOutcome::GuardBlocked {
            impact_bps: Some(Decimal::new(25, 0)),
            tolerance_bps: 20,
            reason: "impact".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "guard_blocked");
        assert_eq!(json["tolerance_bps"], 20);
    }
}
