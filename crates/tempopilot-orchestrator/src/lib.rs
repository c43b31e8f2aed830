//! # tempopilot-orchestrator
//!
//! **Dual-mode transaction orchestration.**
//!
//! The orchestrator drives every value-moving action of a session through one
//! [`TransferExecutor`] capability:
//!
//! 1. **Live mode**: a reachable executor; every call is awaited to its receipt
//! 2. **Simulated mode**: [`SimulatedExecutor`]; deterministic success with
//!    synthetic `0xsim` references
//!
//! The mode is chosen once in [`Orchestrator::start`] by probing the live
//! executor. Every attempt (payment, settlement leg, quote, swap, network or
//! balance check) appends exactly one entry to the [`AuditTrail`].
//!
//! ## Flow
//!
//! ```text
//! SessionContext ─▶ Orchestrator::start ─▶ probe live executor
//!                                             │
//!            ┌────────────────────────────────┴───────────────┐
//!            ▼                                                ▼
//!        Live mode                                     Simulated mode
//!            │                                                │
//!            └──▶ send_payment / run_settlement / quote / execute_swap
//!                                  │
//!                                  ▼
//!                      AuditTrail ─▶ JourneyProgress
//! ```

pub mod audit_trail;
pub mod executor;
pub mod idempotency;
pub mod orchestrator;
pub mod outcome;
pub mod progress;
pub mod session;
pub mod simulated;

pub use audit_trail::AuditTrail;
pub use executor::{ExecutorError, ExecutorResult, SwapRequest, TransferExecutor, TransferRequest};
pub use idempotency::{LegKey, SettledLegs};
pub use orchestrator::Orchestrator;
pub use outcome::{ExecutionOutcome, QuoteOutcome, SettlementSummary, WalletBalances};
pub use progress::{JourneyProgress, NextStep};
pub use session::{ExecutionMode, NetworkStatus, SessionContext};
pub use simulated::SimulatedExecutor;
