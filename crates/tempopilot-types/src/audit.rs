//! Audit entry types.
//!
//! Every orchestration attempt (payment, settlement leg, quote, swap, network
//! or balance check) produces exactly one [`AuditEntry`], success or failure.
//! The entries form the only durable record of what was attempted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TxReference;

/// Severity of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A live action completed.
    Info,
    /// A simulated action, a degraded path, or a non-fatal read failure.
    Warning,
    /// A failed or refused action.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The operation an audit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Session start and mode selection.
    Session,
    /// Network id check.
    Network,
    /// Wallet balance refresh.
    Balances,
    /// Single payment.
    Payment,
    /// One settlement leg.
    Settlement,
    /// Swap quote.
    Quote,
    /// Swap execution.
    Swap,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session => write!(f, "SESSION"),
            Self::Network => write!(f, "NETWORK"),
            Self::Balances => write!(f, "BALANCES"),
            Self::Payment => write!(f, "PAYMENT"),
            Self::Settlement => write!(f, "SETTLEMENT"),
            Self::Quote => write!(f, "QUOTE"),
            Self::Swap => write!(f, "SWAP"),
        }
    }
}

/// Structured payload attached to an audit entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditMeta {
    /// Transaction reference, live or synthetic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<TxReference>,
    /// Memo text attached to a transfer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Hex digest of the settlement plan a leg belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_root: Option<String>,
}

impl AuditMeta {
    #[must_use]
    pub fn tx(reference: TxReference) -> Self {
        Self {
            tx: Some(reference),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    #[must_use]
    pub fn with_plan_root(mut self, plan_root: impl Into<String>) -> Self {
        self.plan_root = Some(plan_root.into());
        self
    }
}

/// One append-only audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub operation: Operation,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<AuditMeta>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(
        severity: Severity,
        operation: Operation,
        message: impl Into<String>,
        meta: Option<AuditMeta>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            operation,
            message: message.into(),
            meta,
        }
    }

    /// Whether the described attempt did not fail.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.severity != Severity::Error
    }

    /// Transaction reference recorded with this entry, if any.
    #[must_use]
    pub fn tx(&self) -> Option<&TxReference> {
        self.meta.as_ref().and_then(|m| m.tx.as_ref())
    }
}

impl std::fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.timestamp.to_rfc3339(),
            self.severity,
            self.operation,
            self.message
        )
    }
}
