//! Debt netting: turn net balances into settling transfers.
//!
//! # Algorithm
//!
//! 1. Split balances into debtors (negative) and creditors (positive)
//! 2. Sort both largest-first (stable: ties keep balance order)
//! 3. Pay the largest remaining debtor into the largest remaining creditor
//!    for `min(owed, due)`, advance whichever side reaches zero
//! 4. Stop when either side is exhausted
//!
//! ```text
//! Balances:  A: -30   B: -10   C: +40
//! Plan:      A -> C 30
//!            B -> C 10
//! ```
//!
//! Greedy largest-first usually yields few transfers but is a heuristic: some
//! distributions with three or more debtors and creditors admit a pairing with
//! fewer transfers. Plans are externally visible, so the heuristic is kept as
//! is rather than replaced by an exact solver.

use tempopilot_types::{MinorUnits, ParticipantId, Result, TempoPilotError, Transfer};

use crate::Balances;

/// Produce the settlement plan for `balances`.
///
/// Every transfer is strictly positive, never a self-transfer, and applying
/// the plan zeroes every balance of a zero-sum input.
#[must_use]
pub fn settlement_plan(balances: &Balances) -> Vec<Transfer> {
    let mut debtors: Vec<(ParticipantId, MinorUnits)> = Vec::new();
    let mut creditors: Vec<(ParticipantId, MinorUnits)> = Vec::new();
    for (id, amount) in balances.iter() {
        // Balances never hold `MinorUnits::MIN`, so negation cannot overflow.
        if amount < 0 {
            debtors.push((id, -amount));
        } else if amount > 0 {
            creditors.push((id, amount));
        }
    }

    // `sort_by` is stable: equal amounts keep their balance order.
    debtors.sort_by(|a, b| b.1.cmp(&a.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.min(creditors[j].1);
        transfers.push(Transfer {
            from: debtors[i].0,
            to: creditors[j].0,
            amount_minor_units: amount,
        });

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;
        if debtors[i].1 == 0 {
            i += 1;
        }
        if creditors[j].1 == 0 {
            j += 1;
        }
    }

    tracing::debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        transfers = transfers.len(),
        "Settlement plan computed"
    );
    transfers
}

/// Check that `plan` settles `balances` exactly.
///
/// # Errors
/// - [`TempoPilotError::BalanceInvariantViolation`] if any transfer is
///   non-positive or a self-transfer, or if a balance is non-zero afterwards
/// - `AmountOverflow` if applying the plan leaves the representable range
pub fn verify_plan(balances: &Balances, plan: &[Transfer]) -> Result<()> {
    if let Some(bad) = plan
        .iter()
        .find(|t| t.amount_minor_units <= 0 || t.from == t.to)
    {
        return Err(TempoPilotError::BalanceInvariantViolation {
            reason: format!("invalid transfer {bad}"),
        });
    }

    let after = balances.after_transfers(plan)?;
    if let Some((id, left)) = after.iter().find(|(_, amount)| *amount != 0) {
        return Err(TempoPilotError::BalanceInvariantViolation {
            reason: format!(
                "participant {id} left at {left} after {} transfers (total before: {})",
                plan.len(),
                balances.total()
            ),
        });
    }
    Ok(())
}
