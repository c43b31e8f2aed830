//! Shared expenses.

use serde::{Deserialize, Serialize};

use crate::money::MinorUnits;
use crate::{ExpenseId, ParticipantId, Result, TempoPilotError};

/// An expense paid by one participant and shared by a subset of the group.
///
/// `participant_ids` order is significant: the first `amount % n`
/// participants absorb one extra minor unit each when the amount does not
/// split evenly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    /// Exact amount in minor units. Never negative.
    pub amount_minor_units: MinorUnits,
    pub payer_id: ParticipantId,
    pub participant_ids: Vec<ParticipantId>,
}

impl Expense {
    /// Create a validated expense.
    ///
    /// Duplicate participant ids are dropped, keeping the first occurrence.
    ///
    /// # Errors
    /// - `MissingField` if the description is blank
    /// - `InvalidAmount` if the amount is not positive
    /// - `EmptyParticipants` if nobody shares the expense
    pub fn new(
        description: &str,
        amount_minor_units: MinorUnits,
        payer_id: ParticipantId,
        participant_ids: &[ParticipantId],
    ) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TempoPilotError::MissingField("description"));
        }
        if amount_minor_units <= 0 {
            return Err(TempoPilotError::InvalidAmount {
                reason: format!("expense amount must be positive, got {amount_minor_units}"),
            });
        }

        let mut unique = Vec::with_capacity(participant_ids.len());
        for id in participant_ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        if unique.is_empty() {
            return Err(TempoPilotError::EmptyParticipants);
        }

        Ok(Self {
            id: ExpenseId::new(),
            description: description.to_string(),
            amount_minor_units,
            payer_id,
            participant_ids: unique,
        })
    }

    /// Share owed by the participant at `position` in `participant_ids`.
    #[must_use]
    pub fn share_at(&self, position: usize) -> MinorUnits {
        let Ok(count) = MinorUnits::try_from(self.participant_ids.len()) else {
            return 0;
        };
        if count == 0 || position >= self.participant_ids.len() {
            return 0;
        }
        let base = self.amount_minor_units / count;
        let remainder = self.amount_minor_units % count;
        let extra = MinorUnits::from(i64::try_from(position).is_ok_and(|p| p < remainder));
        base + extra
    }
}
