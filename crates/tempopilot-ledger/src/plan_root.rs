//! Settlement plan digests.
//!
//! A plan is recomputed from the expense history every time it is requested.
//! The plan root is a SHA-256 digest over the ordered transfers, so a caller
//! can check that the plan it previewed is the plan being executed, and audit
//! entries for individual legs can be tied back to one plan.

use sha2::{Digest, Sha256};
use tempopilot_types::Transfer;

/// Compute the root hash of an ordered settlement plan.
///
/// Depends on transfer order, both participant ids and the amount. The same
/// plan always produces the same root.
#[must_use]
pub fn compute_plan_root(plan: &[Transfer]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"tempopilot:plan_root:v1:");
    hasher.update((plan.len() as u64).to_le_bytes());

    for transfer in plan {
        hasher.update(transfer.from.0.as_bytes());
        hasher.update(transfer.to.0.as_bytes());
        hasher.update(transfer.amount_minor_units.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Hex form of [`compute_plan_root`], as recorded in audit metadata.
#[must_use]
pub fn plan_root_hex(plan: &[Transfer]) -> String {
    hex::encode(compute_plan_root(plan))
}

/// Recompute the root of `plan` and compare with `expected_root`.
#[must_use]
pub fn verify_plan_root(plan: &[Transfer], expected_root: &[u8; 32]) -> bool {
    compute_plan_root(plan) == *expected_root
}
