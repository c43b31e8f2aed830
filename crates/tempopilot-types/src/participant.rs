//! Group participants.

use serde::{Deserialize, Serialize};

use crate::{Address, ParticipantId, Result, TempoPilotError, resolve_address};

/// A member of the expense-sharing group.
///
/// Never mutated after creation; removing a participant drops it from the
/// group collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Session-stable identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Wallet address or human handle.
    pub identifier: String,
}

impl Participant {
    /// Create a participant. Name and identifier are trimmed and required.
    ///
    /// # Errors
    /// Returns [`TempoPilotError::MissingField`] if either value is blank.
    pub fn new(name: &str, identifier: &str) -> Result<Self> {
        let name = name.trim();
        let identifier = identifier.trim();
        if name.is_empty() {
            return Err(TempoPilotError::MissingField("name"));
        }
        if identifier.is_empty() {
            return Err(TempoPilotError::MissingField("identifier"));
        }
        Ok(Self {
            id: ParticipantId::new(),
            name: name.to_string(),
            identifier: identifier.to_string(),
        })
    }

    /// The participant's address: the identifier itself if address-like,
    /// otherwise its pseudo-address.
    #[must_use]
    pub fn address(&self) -> Address {
        resolve_address(&self.identifier)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Participant {
    /// Participant whose identifier is a handle derived from the name.
    pub fn dummy(name: &str) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.to_string(),
            identifier: format!("{}@example.com", name.to_lowercase()),
        }
    }

    /// Participant with an explicit address identifier.
    pub fn dummy_with_address(name: &str, address: &str) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.to_string(),
            identifier: address.to_string(),
        }
    }
}
