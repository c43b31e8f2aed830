//! Identifiers used throughout TempoPilot.
//!
//! Participants and expenses use UUIDv7 for time-ordered sorting. Assets and
//! transaction references are opaque strings owned by the settlement network.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants;

// ---------------------------------------------------------------------------
// ParticipantId
// ---------------------------------------------------------------------------

/// Unique identifier for a group participant. Stable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ExpenseId
// ---------------------------------------------------------------------------

/// Unique identifier for a recorded expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ExpenseId(pub Uuid);

impl ExpenseId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exp:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Token contract identifier on the settlement network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_lowercase())
    }

    #[must_use]
    pub fn alpha_usd() -> Self {
        Self::new(constants::ALPHA_USD)
    }

    #[must_use]
    pub fn beta_usd() -> Self {
        Self::new(constants::BETA_USD)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// TxReference
// ---------------------------------------------------------------------------

/// Reference to a committed (or simulated) transaction.
///
/// Live references are transaction hashes returned by the executor; simulated
/// references are synthetic and start with `0xsim`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxReference(pub String);

impl TxReference {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Deterministic synthetic reference for the `sequence`-th simulated action.
    #[must_use]
    pub fn synthetic(sequence: u64) -> Self {
        Self(format!("0xsim{sequence:060x}"))
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.0.starts_with("0xsim")
    }

    /// Explorer link for this reference, or `None` for synthetic references.
    #[must_use]
    pub fn explorer_url(&self, explorer_base: &str) -> Option<String> {
        if self.is_synthetic() {
            return None;
        }
        Some(format!("{explorer_base}{}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_id_uniqueness() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn participant_id_ordering() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        assert!(a < b);
    }

    #[test]
    fn asset_id_is_normalized() {
        let asset = AssetId::new("  0x20C0000000000000000000000000000000000001 ");
        assert_eq!(asset, AssetId::alpha_usd());
    }

    #[test]
    fn synthetic_reference_is_deterministic() {
        let a = TxReference::synthetic(7);
        assert_eq!(a, TxReference::synthetic(7));
        assert_ne!(a, TxReference::synthetic(8));
        assert!(a.is_synthetic());
        assert_eq!(a.as_str().len(), 65);
    }

    #[test]
    fn explorer_url_only_for_live_references() {
        let live = TxReference::new("0xabc");
        assert_eq!(
            live.explorer_url(constants::DEFAULT_EXPLORER_BASE).as_deref(),
            Some("https://explore.tempo.xyz/tx/0xabc")
        );
        assert!(
            TxReference::synthetic(1)
                .explorer_url(constants::DEFAULT_EXPLORER_BASE)
                .is_none()
        );
    }

    #[test]
    fn serde_roundtrips() {
        let pid = ParticipantId::new();
        let json = serde_json::to_string(&pid).unwrap();
        let back: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(pid, back);

        let reference = TxReference::new("0xdeadbeef");
        let json = serde_json::to_string(&reference).unwrap();
        let back: TxReference = serde_json::from_str(&json).unwrap();
        assert_eq!(reference, back);
    }
}
