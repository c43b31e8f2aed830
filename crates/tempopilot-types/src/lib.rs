//! # tempopilot-types
//!
//! Shared types, errors, and configuration for the **TempoPilot** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ParticipantId`], [`ExpenseId`], [`AssetId`], [`TxReference`]
//! - **Money**: minor-unit parsing/formatting and token unit conversion ([`money`])
//! - **Addresses**: [`Address`], [`is_address_like`], [`resolve_address`]
//! - **Memos**: [`Memo`] (32-byte on-chain memo encoding)
//! - **Group model**: [`Participant`], [`Expense`]
//! - **Settlement model**: [`Transfer`], [`SettlementLeg`]
//! - **Quote model**: [`Quote`]
//! - **Audit model**: [`AuditEntry`], [`Severity`], [`Operation`], [`AuditMeta`]
//! - **Configuration**: [`SessionConfig`], [`SwapDefaults`]
//! - **Errors**: [`TempoPilotError`] with `TP_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod address;
pub mod audit;
pub mod config;
pub mod constants;
pub mod error;
pub mod expense;
pub mod ids;
pub mod memo;
pub mod money;
pub mod participant;
pub mod quote;
pub mod transfer;

// Re-export primary types at crate root for ergonomic imports:
//   use tempopilot_types::{Participant, Expense, Transfer, Quote, ...};

pub use address::*;
pub use audit::*;
pub use config::*;
pub use error::*;
pub use expense::*;
pub use ids::*;
pub use memo::*;
pub use participant::*;
pub use quote::*;
pub use transfer::*;

pub use money::MinorUnits;

// Constants are accessed via `tempopilot_types::constants::FOO` and money
// helpers via `tempopilot_types::money::to_minor_units` (not re-exported to
// keep call sites explicit).
