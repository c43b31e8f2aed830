//! Settlement idempotency: a leg commits at most once per session.
//!
//! A settlement run does not change the expenses, so re-running after a
//! partial failure recomputes the same plan with the same root. Legs are
//! keyed by `(plan root, leg index)`; a key that already committed is never
//! submitted again, while failed legs stay eligible for the next run.
//!
//! The set is bounded: at capacity the oldest key is evicted.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use tempopilot_types::{Result, TempoPilotError};

/// Identity of one leg within one settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LegKey {
    pub plan_root: String,
    pub index: usize,
}

impl LegKey {
    #[must_use]
    pub fn new(plan_root: &str, index: usize) -> Self {
        Self {
            plan_root: plan_root.to_string(),
            index,
        }
    }
}

impl fmt::Display for LegKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.plan_root, self.index)
    }
}

/// Committed settlement legs of a session.
#[derive(Debug)]
pub struct SettledLegs {
    settled: HashSet<LegKey>,
    /// Insertion order, front = oldest.
    order: VecDeque<LegKey>,
    capacity: usize,
}

impl SettledLegs {
    /// # Panics
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SettledLegs capacity must be > 0");
        Self {
            settled: HashSet::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Record a committed leg.
    ///
    /// # Errors
    /// Returns [`TempoPilotError::LegAlreadySettled`] if `key` is already
    /// recorded.
    pub fn mark_settled(&mut self, key: LegKey) -> Result<()> {
        if self.settled.contains(&key) {
            return Err(TempoPilotError::LegAlreadySettled(key.to_string()));
        }

        if self.settled.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.settled.remove(&oldest);
            }
        }

        self.settled.insert(key.clone());
        self.order.push_back(key);
        Ok(())
    }

    #[must_use]
    pub fn is_settled(&self, key: &LegKey) -> bool {
        self.settled.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}
