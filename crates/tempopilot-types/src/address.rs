//! Address-like identifiers and the fallback pseudo-address scheme.
//!
//! Participants are identified either by a real `0x` address or by a human
//! handle (email, name). Handles resolve to a deterministic pseudo-address so
//! the same handle maps to the same address in every session.
//!
//! The pseudo-address is a 32-bit rolling hash and is **not** collision
//! resistant. Two handles can map to the same address; nothing here detects it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ADDRESS_LEN;
use crate::{Result, TempoPilotError};

/// A lower-cased `0x` + 40 hex digit address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Parse an address-like string, normalizing case.
    ///
    /// # Errors
    /// Returns [`TempoPilotError::MalformedAddress`] if `value` is not address-like.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if !is_address_like(trimmed) {
            return Err(TempoPilotError::MalformedAddress(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural check: `0x` followed by exactly 40 hex digits.
///
/// Does not verify checksum casing or that the account exists.
#[must_use]
pub fn is_address_like(value: &str) -> bool {
    let value = value.trim();
    value.len() == ADDRESS_LEN
        && value.starts_with("0x")
        && value[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Resolve an identifier to an address.
///
/// Address-like identifiers are returned lower-cased. Anything else is hashed
/// into a stable pseudo-address.
#[must_use]
pub fn resolve_address(identifier: &str) -> Address {
    let text = identifier.trim().to_lowercase();
    if is_address_like(&text) {
        return Address(text);
    }
    let hash = text
        .encode_utf16()
        .fold(0u32, |acc, unit| acc.wrapping_mul(31).wrapping_add(u32::from(unit)));
    let segment = format!("{hash:08x}");
    Address(format!("0x{}", segment.repeat(5)))
}
