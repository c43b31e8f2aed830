//! Fixed-width transfer memos.
//!
//! The settlement network attaches a `bytes32` memo to each transfer. Text is
//! UTF-8 encoded, truncated to 32 bytes, and zero padded.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MEMO_BYTES, SETTLEMENT_MEMO_PREFIX};

/// A 32-byte transfer memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Memo(pub [u8; MEMO_BYTES]);

impl Memo {
    /// Encode memo text. Bytes past the 32nd are dropped, even mid-character.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut bytes = [0u8; MEMO_BYTES];
        let src = text.as_bytes();
        let len = src.len().min(MEMO_BYTES);
        bytes[..len].copy_from_slice(&src[..len]);
        Self(bytes)
    }

    /// Memo for one settlement leg: `SPLIT|<from>|<to>|<unix ms>`.
    #[must_use]
    pub fn settlement(from_name: &str, to_name: &str, unix_ms: i64) -> Self {
        Self::from_text(&format!(
            "{SETTLEMENT_MEMO_PREFIX}|{from_name}|{to_name}|{unix_ms}"
        ))
    }

    /// `0x` + 64 hex digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; MEMO_BYTES] {
        &self.0
    }

    /// Memo text with the zero padding stripped (lossy for truncated characters).
    #[must_use]
    pub fn text(&self) -> String {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
