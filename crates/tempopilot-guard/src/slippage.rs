//! Slippage floor for swap commits.

use tempopilot_types::constants::BPS_DENOMINATOR;
use tempopilot_types::{Result, TempoPilotError};

/// `quoted_out * (10000 - slippage_bps) / 10000`, rounded down, in base units.
///
/// # Errors
/// - `InvalidBps` if `slippage_bps` exceeds 10000
/// - `AmountOverflow` if the intermediate product does not fit `u128`
pub fn min_amount_out(quoted_out_units: u128, slippage_bps: u32) -> Result<u128> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(TempoPilotError::InvalidBps {
            value: slippage_bps,
        });
    }
    let keep = u128::from(BPS_DENOMINATOR - slippage_bps);
    quoted_out_units
        .checked_mul(keep)
        .map(|scaled| scaled / u128::from(BPS_DENOMINATOR))
        .ok_or_else(|| TempoPilotError::AmountOverflow {
            reason: format!("{quoted_out_units} * {keep} overflows"),
        })
}
