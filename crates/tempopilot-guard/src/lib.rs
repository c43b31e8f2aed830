//! # tempopilot-guard
//!
//! **Pre-commit safety checks for value-moving swaps.**
//!
//! - [`PriceGuard`]: refuses a swap whose latest quote deviates from parity by
//!   more than the tolerance, or when there is no usable quote (fail-closed)
//! - [`min_amount_out`]: the slippage floor passed to the executor, computed
//!   in integer base units
//!
//! ```text
//! quote() → PriceGuard.check() → min_amount_out() → executor.swap()
//! ```

pub mod price_guard;
pub mod slippage;

pub use price_guard::{PriceGuard, is_within_guard, price_impact_bps};
pub use slippage::min_amount_out;
