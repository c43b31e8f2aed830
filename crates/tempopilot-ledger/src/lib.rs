//! # tempopilot-ledger
//!
//! **Pure deterministic ledger engine for TempoPilot.**
//!
//! The ledger takes a group's participants and expenses and produces:
//!
//! - **Net balances**: exact integer minor units, zero-sum by construction
//! - **Settlement plan**: greedy largest-first debt netting
//! - **Plan root**: a digest that pins a previewed plan to its execution
//!
//! Nothing here performs I/O or moves funds; the orchestrator executes plans.

pub mod balances;
pub mod ledger;
pub mod netting;
pub mod plan_root;

pub use balances::{Balances, compute_balances};
pub use ledger::Ledger;
pub use netting::{settlement_plan, verify_plan};
pub use plan_root::{compute_plan_root, plan_root_hex, verify_plan_root};
