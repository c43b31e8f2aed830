//! Bounded, append-only audit trail.
//!
//! The trail is the session's only durable record of attempted actions. It
//! keeps the most recent `capacity` entries; when full, the oldest entry is
//! evicted to make room (front = oldest).

use std::collections::VecDeque;

use tempopilot_types::{AuditEntry, AuditMeta, Operation, Result, Severity};

/// Bounded FIFO of [`AuditEntry`] values.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    entries: VecDeque<AuditEntry>,
    capacity: usize,
}

impl AuditTrail {
    /// Create an empty trail holding at most `capacity` entries.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "AuditTrail capacity must be > 0");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest if at capacity.
    pub fn record(&mut self, entry: AuditEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        tracing::trace!(
            operation = %entry.operation,
            severity = %entry.severity,
            message = %entry.message,
            "Audit entry recorded"
        );
        self.entries.push_back(entry);
    }

    /// Build and append an entry stamped now.
    pub fn push(
        &mut self,
        severity: Severity,
        operation: Operation,
        message: impl Into<String>,
        meta: Option<AuditMeta>,
    ) {
        self.record(AuditEntry::new(severity, operation, message, meta));
    }

    /// Entries oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &AuditEntry> + '_ {
        self.entries.iter()
    }

    /// Entries describing `operation`, oldest first.
    pub fn for_operation(&self, operation: Operation) -> impl Iterator<Item = &AuditEntry> + '_ {
        self.entries.iter().filter(move |e| e.operation == operation)
    }

    /// Whether any retained entry records a successful `operation`.
    pub fn has_succeeded(&self, operation: Operation) -> bool {
        self.for_operation(operation).any(AuditEntry::succeeded)
    }

    pub fn latest(&self) -> Option<&AuditEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Export the trail (oldest first) as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }
}
