//! Price guard: hard gate in front of every swap commit.
//!
//! Both reference assets track the same unit value, so deviation of the
//! implied price from parity stands in for price impact.
//!
//! - **Fail-closed**: a missing quote or a quote for another pair refuses
//! - **Latest quote only**: the caller passes the most recently fetched quote
//! - **Inclusive bound**: impact equal to the tolerance passes
//! - **Checked**: an impact too large to compute refuses like any other breach

use rust_decimal::Decimal;
use tempopilot_types::constants::BPS_DENOMINATOR;
use tempopilot_types::{AssetId, Quote, Result, TempoPilotError};

/// `|1 - implied_price| * 10000`, in basis points. Never negative.
///
/// `None` if the impact does not fit a decimal.
#[must_use]
pub fn price_impact_bps(quote: &Quote) -> Option<Decimal> {
    Decimal::ONE
        .checked_sub(quote.implied_price()?)?
        .abs()
        .checked_mul(Decimal::from(BPS_DENOMINATOR))
}

/// `impact_bps <= tolerance_bps`.
#[must_use]
pub fn is_within_guard(impact_bps: Decimal, tolerance_bps: u32) -> bool {
    impact_bps <= Decimal::from(tolerance_bps)
}

/// Price impact gate with a fixed tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceGuard {
    tolerance_bps: u32,
}

impl PriceGuard {
    /// # Errors
    /// Returns [`TempoPilotError::InvalidBps`] if `tolerance_bps` exceeds 10000.
    pub fn new(tolerance_bps: u32) -> Result<Self> {
        if tolerance_bps > BPS_DENOMINATOR {
            return Err(TempoPilotError::InvalidBps {
                value: tolerance_bps,
            });
        }
        Ok(Self { tolerance_bps })
    }

    #[must_use]
    pub fn tolerance_bps(&self) -> u32 {
        self.tolerance_bps
    }

    /// Check the latest quote for a swap of `asset_in` into `asset_out`.
    ///
    /// Returns the measured impact when the swap may proceed.
    ///
    /// # Errors
    /// - `QuoteMissing` if no quote was fetched
    /// - `QuoteStale` if the latest quote is for a different pair
    /// - `ImpactUnmeasurable` if the impact overflows
    /// - `PriceImpactExceeded` if the impact is above the tolerance
    pub fn check(
        &self,
        quote: Option<&Quote>,
        asset_in: &AssetId,
        asset_out: &AssetId,
    ) -> Result<Decimal> {
        let quote = quote.ok_or(TempoPilotError::QuoteMissing)?;
        if !quote.covers(asset_in, asset_out) {
            return Err(TempoPilotError::QuoteStale {
                reason: format!(
                    "latest quote is {} -> {}, swap is {asset_in} -> {asset_out}",
                    quote.asset_in, quote.asset_out
                ),
            });
        }

        let impact_bps =
            price_impact_bps(quote).ok_or_else(|| TempoPilotError::ImpactUnmeasurable {
                reason: format!("quote {quote} is out of range"),
            })?;
        if !is_within_guard(impact_bps, self.tolerance_bps) {
            tracing::warn!(
                impact_bps = %impact_bps,
                tolerance_bps = self.tolerance_bps,
                "Price guard refused swap"
            );
            return Err(TempoPilotError::PriceImpactExceeded {
                impact_bps,
                tolerance_bps: self.tolerance_bps,
            });
        }

        tracing::debug!(
            impact_bps = %impact_bps,
            tolerance_bps = self.tolerance_bps,
            "Price guard passed"
        );
        Ok(impact_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64, scale: u32) -> Decimal {
        Decimal::new(n, scale)
    }

    #[test]
    fn impact_is_distance_from_parity() {
        let impact = |price| price_impact_bps(&Quote::dummy(100, price));
        assert_eq!(impact(Decimal::ONE), Some(Decimal::ZERO));
        assert_eq!(impact(dec(998, 3)), Some(dec(20, 0)));
        assert_eq!(impact(dec(1005, 3)), Some(dec(50, 0)));
    }

    #[test]
    fn guard_boundary_is_inclusive() {
        assert!(is_within_guard(dec(20, 0), 20));
        assert!(!is_within_guard(dec(21, 0), 20));
        assert!(!is_within_guard(dec(2001, 2), 20));
        assert!(is_within_guard(Decimal::ZERO, 0));
    }

    #[test]
    fn simulated_rate_passes_default_tolerance() {
        let guard = PriceGuard::new(20).unwrap();
        let quote = Quote::dummy(100, dec(998, 3));
        let impact = guard
            .check(Some(&quote), &AssetId::alpha_usd(), &AssetId::beta_usd())
            .unwrap();
        assert_eq!(impact, dec(20, 0));
    }

    #[test]
    fn excessive_impact_blocked() {
        let guard = PriceGuard::new(10).unwrap();
        let quote = Quote::dummy(100, dec(998, 3));
        let err = guard
            .check(Some(&quote), &AssetId::alpha_usd(), &AssetId::beta_usd())
            .unwrap_err();
        assert!(matches!(
            err,
            TempoPilotError::PriceImpactExceeded { tolerance_bps: 10, .. }
        ));
        assert!(err.is_guard_violation());
    }

    #[test]
    fn missing_quote_fails_closed() {
        let guard = PriceGuard::new(10_000).unwrap();
        let err = guard
            .check(None, &AssetId::alpha_usd(), &AssetId::beta_usd())
            .unwrap_err();
        assert!(matches!(err, TempoPilotError::QuoteMissing));
    }

    #[test]
    fn quote_for_other_pair_is_stale() {
        let guard = PriceGuard::new(10_000).unwrap();
        let quote = Quote::dummy(100, Decimal::ONE);
        let err = guard
            .check(Some(&quote), &AssetId::beta_usd(), &AssetId::alpha_usd())
            .unwrap_err();
        assert!(matches!(err, TempoPilotError::QuoteStale { .. }));
    }

    #[test]
    fn tolerance_above_denominator_rejected() {
        assert!(matches!(
            PriceGuard::new(10_001),
            Err(TempoPilotError::InvalidBps { value: 10_001 })
        ));
    }

    #[test]
    fn extreme_quote_is_refused_not_measured() {
        // One base unit in, 10^28 out: the price fits a decimal, the impact
        // in basis points does not.
        let quote = Quote::from_units(
            AssetId::alpha_usd(),
            AssetId::beta_usd(),
            1,
            10u128.pow(28),
            6,
        )
        .unwrap();
        assert_eq!(price_impact_bps(&quote), None);

        let guard = PriceGuard::new(BPS_DENOMINATOR).unwrap();
        let err = guard
            .check(Some(&quote), &AssetId::alpha_usd(), &AssetId::beta_usd())
            .unwrap_err();
        assert!(matches!(err, TempoPilotError::ImpactUnmeasurable { .. }));
        assert!(err.is_guard_violation());
    }
}
