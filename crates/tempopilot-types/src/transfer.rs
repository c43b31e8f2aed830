//! Settlement transfers produced by debt netting.
//!
//! A [`Transfer`] is the id-level output of the netting engine. A
//! [`SettlementLeg`] is the same transfer resolved against the group, carrying
//! enough of each participant to address and label the payment.

use serde::{Deserialize, Serialize};

use crate::money::{self, MinorUnits};
use crate::{Address, Memo, Participant, ParticipantId};

/// One settling payment: `from` (debtor) pays `to` (creditor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Always strictly positive.
    pub amount_minor_units: MinorUnits,
}

impl std::fmt::Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ${}",
            self.from,
            self.to,
            money::to_decimal_string(self.amount_minor_units)
        )
    }
}

/// A [`Transfer`] resolved to the participants on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementLeg {
    pub from: Participant,
    pub to: Participant,
    pub amount_minor_units: MinorUnits,
}

impl SettlementLeg {
    #[must_use]
    pub fn debtor_address(&self) -> Address {
        self.from.address()
    }

    #[must_use]
    pub fn creditor_address(&self) -> Address {
        self.to.address()
    }

    /// Whether `caller` is the debtor of this leg. Only debtors execute legs.
    #[must_use]
    pub fn is_payable_by(&self, caller: &Address) -> bool {
        self.debtor_address() == *caller
    }

    /// On-chain memo for this leg, stamped with `unix_ms`.
    #[must_use]
    pub fn memo(&self, unix_ms: i64) -> Memo {
        Memo::settlement(&self.from.name, &self.to.name, unix_ms)
    }

    /// The id-level transfer this leg was resolved from.
    #[must_use]
    pub fn transfer(&self) -> Transfer {
        Transfer {
            from: self.from.id,
            to: self.to.id,
            amount_minor_units: self.amount_minor_units,
        }
    }
}

impl std::fmt::Display for SettlementLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ${}",
            self.from.name,
            self.to.name,
            money::to_decimal_string(self.amount_minor_units)
        )
    }
}
