//! Explicit per-session state.
//!
//! Passed into [`Orchestrator::start`](crate::Orchestrator::start); there is
//! no process-wide session state.

use serde::{Deserialize, Serialize};
use tempopilot_types::{Address, Quote, Result, SessionConfig};

use crate::outcome::WalletBalances;

/// How the session executes value-moving actions. Fixed at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Simulated,
    Live,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// Result of the most recent network check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NetworkStatus {
    NotChecked,
    /// Checked in simulated mode; nothing was contacted.
    Simulated,
    Ready { network_id: u64 },
    WrongNetwork { expected: u64, actual: u64 },
    CheckFailed { reason: String },
}

impl NetworkStatus {
    /// Whether the session may proceed past the network step.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Simulated | Self::Ready { .. })
    }
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotChecked => write!(f, "Not checked"),
            Self::Simulated => write!(f, "Simulated"),
            Self::Ready { network_id } => write!(f, "Network {network_id} OK"),
            Self::WrongNetwork { actual, .. } => write!(f, "Wrong network: {actual}"),
            Self::CheckFailed { .. } => write!(f, "Network check failed"),
        }
    }
}

/// State of one user session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub config: SessionConfig,
    caller: Option<Address>,
    pub network_status: NetworkStatus,
    /// Most recently fetched quote. Replaced by every quote attempt.
    pub last_quote: Option<Quote>,
    pub wallet_balances: Option<WalletBalances>,
}

impl SessionContext {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            caller: None,
            network_status: NetworkStatus::NotChecked,
            last_quote: None,
            wallet_balances: None,
        }
    }

    /// Set the caller wallet from a `0x` address. Clears cached balances.
    ///
    /// # Errors
    /// Returns `MalformedAddress` if `address` is not a 20-byte hex address.
    pub fn set_caller(&mut self, address: &str) -> Result<&Address> {
        let address = Address::parse(address)?;
        self.wallet_balances = None;
        Ok(self.caller.insert(address))
    }

    #[must_use]
    pub fn caller(&self) -> Option<&Address> {
        self.caller.as_ref()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
