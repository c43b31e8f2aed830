//! The group book: participants and expenses of one shared-expense group.
//!
//! Balances, plans and legs are derived on demand from the full expense
//! history and never stored. An expense is only accepted if the history
//! including it still has representable balances.

use serde::{Deserialize, Serialize};
use tempopilot_types::{
    Expense, ExpenseId, MinorUnits, Participant, ParticipantId, Result, SettlementLeg,
    TempoPilotError, Transfer,
};

use crate::{Balances, compute_balances, settlement_plan};

/// Participants and expenses of one group, in the order they were added.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. Name and identifier are required.
    pub fn add_participant(&mut self, name: &str, identifier: &str) -> Result<ParticipantId> {
        let participant = Participant::new(name, identifier)?;
        let id = participant.id;
        tracing::debug!(participant = %id, name = %participant.name, "Participant added");
        self.participants.push(participant);
        Ok(id)
    }

    /// Record an expense paid by `payer` and shared by `shared_by`.
    ///
    /// # Errors
    /// - `UnknownParticipant` if the payer or any sharer is not in the group
    /// - validation errors from [`Expense::new`]
    /// - `AmountOverflow` if a balance would leave the representable range
    pub fn add_expense(
        &mut self,
        description: &str,
        amount_minor_units: MinorUnits,
        payer: ParticipantId,
        shared_by: &[ParticipantId],
    ) -> Result<ExpenseId> {
        if let Some(unknown) = std::iter::once(&payer)
            .chain(shared_by)
            .find(|id| self.participant(id).is_none())
        {
            return Err(TempoPilotError::UnknownParticipant(*unknown));
        }

        let expense = Expense::new(description, amount_minor_units, payer, shared_by)?;
        let id = expense.id;
        self.expenses.push(expense);
        if let Err(err) = self.balances() {
            self.expenses.pop();
            tracing::warn!(amount = amount_minor_units, error = %err, "Expense rejected");
            return Err(err);
        }
        tracing::debug!(
            expense = %id,
            amount = amount_minor_units,
            payer = %payer,
            shared_by = shared_by.len(),
            "Expense recorded"
        );
        Ok(id)
    }

    /// Drop a participant from the group.
    ///
    /// # Errors
    /// - `UnknownParticipant` if `id` is not in the group
    /// - `ParticipantInUse` if any expense names the participant as payer or
    ///   sharer (there is no cascading delete)
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Result<Participant> {
        let position = self
            .participants
            .iter()
            .position(|p| p.id == *id)
            .ok_or(TempoPilotError::UnknownParticipant(*id))?;
        let referenced = self
            .expenses
            .iter()
            .any(|e| e.payer_id == *id || e.participant_ids.contains(id));
        if referenced {
            return Err(TempoPilotError::ParticipantInUse(*id));
        }
        Ok(self.participants.remove(position))
    }

    #[must_use]
    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == *id)
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Net balances of the group.
    ///
    /// # Errors
    /// `AmountOverflow` for a deserialized history whose balances do not fit.
    pub fn balances(&self) -> Result<Balances> {
        compute_balances(&self.participants, &self.expenses)
    }

    /// Greedy settlement plan of the current balances.
    ///
    /// # Errors
    /// Propagates `AmountOverflow` from [`Ledger::balances`].
    pub fn settlement_plan(&self) -> Result<Vec<Transfer>> {
        Ok(settlement_plan(&self.balances()?))
    }

    /// The settlement plan resolved to participants, in plan order.
    ///
    /// Every id in the plan belongs to the group because expenses can only
    /// reference existing participants and referenced participants cannot be
    /// removed.
    ///
    /// # Errors
    /// Propagates `AmountOverflow` from [`Ledger::balances`].
    pub fn settlement_legs(&self) -> Result<Vec<SettlementLeg>> {
        Ok(self
            .settlement_plan()?
            .into_iter()
            .filter_map(|t| {
                Some(SettlementLeg {
                    from: self.participant(&t.from)?.clone(),
                    to: self.participant(&t.to)?.clone(),
                    amount_minor_units: t.amount_minor_units,
                })
            })
            .collect())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Ledger {
    /// Demo wallet addresses of the three starter participants.
    pub const DEMO_WALLETS: [&'static str; 3] = [
        "0x031891A61200FedDd622EbACC10734BC90093B2A",
        "0xAcF8dBD0352a9D47135DA146EA5DbEfAD58340C4",
        "0x41A75fc9817AF9F2DB0c0e58C71Bc826339b3Acb",
    ];

    /// Starter group: Ava, Neil and Sam share a 120.00 dinner paid by Ava and
    /// a 45.00 cab paid by Neil.
    pub fn starter() -> Self {
        let mut ledger = Self::new();
        let names = ["Ava", "Neil", "Sam"];
        let ids: Vec<ParticipantId> = names
            .iter()
            .zip(Self::DEMO_WALLETS)
            .map(|(name, wallet)| ledger.add_participant(name, wallet).unwrap())
            .collect();
        ledger.add_expense("Dinner", 12_000, ids[0], &ids).unwrap();
        ledger.add_expense("Cab", 4_500, ids[1], &ids).unwrap();
        ledger
    }
}
