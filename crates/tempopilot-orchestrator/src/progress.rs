//! Journey progress derived from session state and the audit trail.

use serde::{Deserialize, Serialize};
use tempopilot_types::Operation;

use crate::{AuditTrail, SessionContext};

/// The next thing a user should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    SetWallet,
    CheckNetwork,
    SendFirstPayment,
    RunQuoteOrSwap,
    ReviewActivity,
}

impl std::fmt::Display for NextStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetWallet => write!(f, "Set wallet in Onboarding"),
            Self::CheckNetwork => write!(f, "Check network"),
            Self::SendFirstPayment => write!(f, "Send first payment"),
            Self::RunQuoteOrSwap => write!(f, "Run quote/swap"),
            Self::ReviewActivity => write!(f, "Open Activity for proof"),
        }
    }
}

/// Completed onboarding steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JourneyProgress {
    pub wallet_set: bool,
    pub network_ready: bool,
    /// A payment succeeded (live or simulated).
    pub payment_sent: bool,
    /// A quote or swap succeeded.
    pub swap_tried: bool,
}

impl JourneyProgress {
    /// Evaluate against the retained audit trail. Steps whose entries were
    /// evicted read as not done.
    #[must_use]
    pub fn evaluate(session: &SessionContext, trail: &AuditTrail) -> Self {
        Self {
            wallet_set: session.caller().is_some(),
            network_ready: session.network_status.is_usable(),
            payment_sent: trail.has_succeeded(Operation::Payment),
            swap_tried: trail.has_succeeded(Operation::Quote)
                || trail.has_succeeded(Operation::Swap),
        }
    }

    /// Steps are taken in order; the first missing one is next.
    #[must_use]
    pub fn next_step(&self) -> NextStep {
        if !self.wallet_set {
            NextStep::SetWallet
        } else if !self.network_ready {
            NextStep::CheckNetwork
        } else if !self.payment_sent {
            NextStep::SendFirstPayment
        } else if !self.swap_tried {
            NextStep::RunQuoteOrSwap
        } else {
            NextStep::ReviewActivity
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_step() == NextStep::ReviewActivity
    }
}
