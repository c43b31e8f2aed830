//! Error types for the TempoPilot settlement engine.
//!
//! All errors use the `TP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input validation errors (reported synchronously, never audited)
//! - 2xx: Ledger errors
//! - 3xx: Guard errors
//! - 4xx: Orchestration errors
//! - 9xx: General / internal errors
//!
//! Executor-side failures have their own type in `tempopilot-orchestrator`
//! (`TP_ERR_7xx`) because they are converted into outcomes, not returned.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ParticipantId;

/// Central error enum for all TempoPilot operations.
#[derive(Debug, Error)]
pub enum TempoPilotError {
    // =================================================================
    // Input Validation Errors (1xx)
    // =================================================================
    /// Amount is zero, negative, or not a number.
    #[error("TP_ERR_100: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// A required field was empty.
    #[error("TP_ERR_101: Missing required field: {0}")]
    MissingField(&'static str),

    /// Input is not a `0x` + 40 hex digit address.
    #[error("TP_ERR_102: Malformed address: {0}")]
    MalformedAddress(String),

    /// The participant is not part of the group.
    #[error("TP_ERR_103: Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    /// An expense must be shared by at least one participant.
    #[error("TP_ERR_104: Expense has no participants")]
    EmptyParticipants,

    /// Basis point value outside `0..=10000`.
    #[error("TP_ERR_105: Invalid basis points: {value}")]
    InvalidBps { value: u32 },

    /// No caller wallet address has been set for the session.
    #[error("TP_ERR_106: Caller wallet address not set")]
    CallerAddressRequired,

    /// Quote amounts must be strictly positive.
    #[error("TP_ERR_107: Invalid quote: {reason}")]
    InvalidQuote { reason: String },

    // =================================================================
    // Ledger Errors (2xx)
    // =================================================================
    /// The participant is still referenced by at least one expense.
    #[error("TP_ERR_200: Participant {0} is referenced by recorded expenses")]
    ParticipantInUse(ParticipantId),

    /// All balances are already zero.
    #[error("TP_ERR_201: Nothing to settle")]
    NothingToSettle,

    /// Applying a settlement plan did not restore zero balances.
    #[error("TP_ERR_202: Balance invariant violation: {reason}")]
    BalanceInvariantViolation { reason: String },

    /// The settlement leg already committed in this session.
    #[error("TP_ERR_203: Settlement leg already committed: {0}")]
    LegAlreadySettled(String),

    // =================================================================
    // Guard Errors (3xx)
    // =================================================================
    /// Price impact of the quote is above the caller's tolerance.
    #[error("TP_ERR_300: Guard blocked swap: impact {impact_bps}bps > {tolerance_bps}bps")]
    PriceImpactExceeded {
        impact_bps: Decimal,
        tolerance_bps: u32,
    },

    /// No quote has been fetched in this session.
    #[error("TP_ERR_301: Guard blocked swap: no quote available")]
    QuoteMissing,

    /// The latest quote does not describe the requested swap.
    #[error("TP_ERR_302: Guard blocked swap: stale quote ({reason})")]
    QuoteStale { reason: String },

    /// The price impact of the latest quote cannot be computed.
    #[error("TP_ERR_303: Guard blocked swap: impact not measurable ({reason})")]
    ImpactUnmeasurable { reason: String },

    // =================================================================
    // Orchestration Errors (4xx)
    // =================================================================
    /// Arithmetic overflow while converting between unit systems.
    #[error("TP_ERR_400: Amount overflow: {reason}")]
    AmountOverflow { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, out-of-range values, etc.).
    #[error("TP_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl TempoPilotError {
    /// Whether this error is a guard refusal (as opposed to bad input).
    #[must_use]
    pub fn is_guard_violation(&self) -> bool {
        matches!(
            self,
            Self::PriceImpactExceeded { .. }
                | Self::QuoteMissing
                | Self::QuoteStale { .. }
                | Self::ImpactUnmeasurable { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TempoPilotError>;

impl From<serde_json::Error> for TempoPilotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TempoPilotError {
    fn from(err: toml::de::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
