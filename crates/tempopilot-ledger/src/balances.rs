//! Net balance computation.
//!
//! For each expense, in recorded order, the payer is credited the full amount
//! and each participant is debited `floor(amount / n)`, with the first
//! `amount % n` participants (in listed order) debited one extra minor unit.
//! Debits therefore always sum to the credit: no rounding leakage.
//!
//! All arithmetic is checked. A balance never reaches `MinorUnits::MIN`, so
//! every balance can be negated when netting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tempopilot_types::{
    Expense, MinorUnits, Participant, ParticipantId, Result, TempoPilotError, Transfer,
};

/// Signed balance per participant, in first-seen order.
///
/// Positive = is owed money, negative = owes money. Order is members first
/// (in group order), then any participant only referenced by an expense.
/// Netting relies on this order to break ties deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(ParticipantId, MinorUnits)>",
    into = "Vec<(ParticipantId, MinorUnits)>"
)]
pub struct Balances {
    entries: Vec<(ParticipantId, MinorUnits)>,
    index: HashMap<ParticipantId, usize>,
}

impl TryFrom<Vec<(ParticipantId, MinorUnits)>> for Balances {
    type Error = TempoPilotError;

    fn try_from(entries: Vec<(ParticipantId, MinorUnits)>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<Balances> for Vec<(ParticipantId, MinorUnits)> {
    fn from(balances: Balances) -> Self {
        balances.entries
    }
}

impl Balances {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build balances from explicit entries. Repeated ids accumulate.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if an accumulated balance leaves the
    /// representable range.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (ParticipantId, MinorUnits)>,
    ) -> Result<Self> {
        let mut balances = Self::new();
        for (id, amount) in entries {
            balances.adjust(id, amount)?;
        }
        Ok(balances)
    }

    /// Register `id` with a zero balance if it is not tracked yet.
    pub fn track(&mut self, id: ParticipantId) {
        if !self.index.contains_key(&id) {
            self.index.insert(id, self.entries.len());
            self.entries.push((id, 0));
        }
    }

    /// Add `delta` to the balance of `id`, tracking it if new.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if the result does not fit in
    /// `-MinorUnits::MAX..=MinorUnits::MAX`. The balance is left unchanged.
    pub fn adjust(&mut self, id: ParticipantId, delta: MinorUnits) -> Result<()> {
        self.track(id);
        let pos = self.index[&id];
        let current = self.entries[pos].1;
        let next = current
            .checked_add(delta)
            .filter(|next| *next != MinorUnits::MIN)
            .ok_or_else(|| TempoPilotError::AmountOverflow {
                reason: format!("balance of {id} at {current} cannot move by {delta}"),
            })?;
        self.entries[pos].1 = next;
        Ok(())
    }

    /// Balance of `id`; untracked participants are settled (0).
    #[must_use]
    pub fn get(&self, id: &ParticipantId) -> MinorUnits {
        self.index.get(id).map_or(0, |&pos| self.entries[pos].1)
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticipantId, MinorUnits)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero for any valid expense set.
    #[must_use]
    pub fn total(&self) -> i128 {
        self.entries
            .iter()
            .map(|(_, amount)| i128::from(*amount))
            .sum()
    }

    /// Whether every balance is zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|(_, amount)| *amount == 0)
    }

    /// Balances after the given transfers are paid: debtor credited, creditor
    /// debited.
    ///
    /// # Errors
    /// Returns `AmountOverflow` if a transfer pushes a balance out of range.
    pub fn after_transfers(&self, transfers: &[Transfer]) -> Result<Self> {
        let mut next = self.clone();
        for transfer in transfers {
            let amount = transfer.amount_minor_units;
            next.adjust(transfer.from, amount)?;
            next.adjust(
                transfer.to,
                amount
                    .checked_neg()
                    .ok_or_else(|| TempoPilotError::AmountOverflow {
                        reason: format!("transfer {transfer} cannot be negated"),
                    })?,
            )?;
        }
        Ok(next)
    }
}

/// Compute each participant's net balance from the full expense history.
///
/// Expenses with an empty participant list are skipped entirely (the payer is
/// not credited either), which keeps the zero-sum invariant. [`Expense::new`]
/// never produces such expenses; this only guards hand-built data.
///
/// # Errors
/// Returns `AmountOverflow` if a running balance leaves the representable
/// range.
pub fn compute_balances(members: &[Participant], expenses: &[Expense]) -> Result<Balances> {
    let mut balances = Balances::new();
    for member in members {
        balances.track(member.id);
    }

    for expense in expenses {
        if expense.participant_ids.is_empty() {
            tracing::warn!(
                expense = %expense.id,
                amount = expense.amount_minor_units,
                "Skipping expense with no participants"
            );
            continue;
        }

        balances.adjust(expense.payer_id, expense.amount_minor_units)?;
        for (position, participant) in expense.participant_ids.iter().enumerate() {
            balances.adjust(*participant, -expense.share_at(position))?;
        }
    }

    tracing::debug!(
        members = members.len(),
        expenses = expenses.len(),
        tracked = balances.len(),
        "Balances computed"
    );
    Ok(balances)
}
