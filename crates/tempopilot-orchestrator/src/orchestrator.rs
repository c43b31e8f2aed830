//! The transaction orchestrator.
//!
//! ## Rules
//!
//! - **One mode per session**: chosen in [`Orchestrator::start`], never changed
//! - **Validate first**: bad input returns `Err` before any executor call and
//!   is never audited
//! - **One audit entry per attempt**: success, simulation, guard refusal or
//!   executor failure (per leg for settlement runs)
//! - **No auto-retry**: each operation is retried by the caller, if at all
//! - **Sequential legs**: a settlement leg completes before the next starts
//! - **Idempotent legs**: a leg that committed is never submitted again

use chrono::Utc;
use rust_decimal::Decimal;
use tempopilot_guard::{PriceGuard, min_amount_out};
use tempopilot_ledger::plan_root_hex;
use tempopilot_types::constants::{BPS_DENOMINATOR, SETTLED_LEG_CAPACITY};
use tempopilot_types::{
    Address, AssetId, AuditMeta, Memo, MinorUnits, Operation, Quote, Result, SettlementLeg,
    Severity, TempoPilotError, Transfer, TxReference, money, resolve_address,
};

use crate::executor::{ExecutorResult, SwapRequest, TransferExecutor, TransferRequest};
use crate::idempotency::{LegKey, SettledLegs};
use crate::outcome::{ExecutionOutcome, QuoteOutcome, SettlementSummary, WalletBalances};
use crate::progress::JourneyProgress;
use crate::session::{ExecutionMode, NetworkStatus, SessionContext};
use crate::{AuditTrail, SimulatedExecutor};

/// Drives payments, settlement legs, quotes and swaps for one session.
pub struct Orchestrator {
    session: SessionContext,
    executor: Box<dyn TransferExecutor>,
    mode: ExecutionMode,
    trail: AuditTrail,
    settled: SettledLegs,
}

impl Orchestrator {
    /// Start a session.
    ///
    /// `live` is probed once with a network id request. If it answers, the
    /// session runs in live mode; if it is absent or fails, the session runs in
    /// simulated mode. Either way the choice is audited.
    ///
    /// # Errors
    /// Returns `Configuration` if the session config is invalid.
    pub async fn start(
        session: SessionContext,
        live: Option<Box<dyn TransferExecutor>>,
    ) -> Result<Self> {
        session.config.validate()?;
        let mut trail = AuditTrail::new(session.config.audit_capacity);
        let simulated = || -> Box<dyn TransferExecutor> {
            Box::new(SimulatedExecutor::new(session.config.expected_network_id))
        };

        let (executor, mode) = match live {
            Some(executor) => match executor.current_network_id().await {
                Ok(network_id) => {
                    tracing::info!(network_id, "Live executor reachable");
                    trail.push(
                        Severity::Info,
                        Operation::Session,
                        format!("Live mode: executor on network {network_id}"),
                        None,
                    );
                    (executor, ExecutionMode::Live)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Live executor unreachable, running simulated");
                    trail.push(
                        Severity::Warning,
                        Operation::Session,
                        format!("Simulated mode: live executor unavailable ({err})"),
                        None,
                    );
                    (simulated(), ExecutionMode::Simulated)
                }
            },
            None => {
                tracing::warn!("No live executor configured, running simulated");
                trail.push(
                    Severity::Warning,
                    Operation::Session,
                    "Simulated mode: no live executor configured",
                    None,
                );
                (simulated(), ExecutionMode::Simulated)
            }
        };

        Ok(Self {
            session,
            executor,
            mode,
            trail,
            settled: SettledLegs::new(SETTLED_LEG_CAPACITY),
        })
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn audit_trail(&self) -> &AuditTrail {
        &self.trail
    }

    /// Switch the caller wallet. See [`SessionContext::set_caller`].
    pub fn set_caller(&mut self, address: &str) -> Result<Address> {
        let caller = self.session.set_caller(address)?.clone();
        tracing::info!(caller = %caller, "Caller wallet set");
        Ok(caller)
    }

    #[must_use]
    pub fn progress(&self) -> JourneyProgress {
        JourneyProgress::evaluate(&self.session, &self.trail)
    }

    /// Explorer link for a live transaction reference.
    #[must_use]
    pub fn explorer_url(&self, tx: &TxReference) -> Option<String> {
        tx.explorer_url(&self.session.config.explorer_base)
    }

    // =====================================================================
    // Network and balances
    // =====================================================================

    /// Compare the executor's network with the expected one.
    ///
    /// A mismatch or a failed request is a status, not an error.
    pub async fn check_network(&mut self) -> NetworkStatus {
        let expected = self.session.config.expected_network_id;
        let (status, severity) = match self.mode {
            ExecutionMode::Simulated => (NetworkStatus::Simulated, Severity::Warning),
            ExecutionMode::Live => match self.executor.current_network_id().await {
                Ok(actual) if actual == expected => (
                    NetworkStatus::Ready { network_id: actual },
                    Severity::Info,
                ),
                Ok(actual) => (
                    NetworkStatus::WrongNetwork { expected, actual },
                    Severity::Warning,
                ),
                Err(err) => (
                    NetworkStatus::CheckFailed {
                        reason: err.to_string(),
                    },
                    Severity::Error,
                ),
            },
        };

        let message = match &status {
            NetworkStatus::CheckFailed { reason } => format!("Network check failed: {reason}"),
            NetworkStatus::Simulated => {
                format!("Simulated network check (expected network {expected})")
            }
            other => format!("Network check -> {other}"),
        };
        tracing::info!(status = %status, "Network checked");
        self.trail.push(severity, Operation::Network, message, None);
        self.session.network_status = status.clone();
        status
    }

    /// Read the caller's balances of the payment and secondary assets.
    ///
    /// Returns `Ok(None)` when the executor fails; the failure is audited as
    /// a warning and cached balances are left untouched.
    ///
    /// # Errors
    /// Returns `CallerAddressRequired` if no caller wallet is set.
    pub async fn refresh_balances(&mut self) -> Result<Option<WalletBalances>> {
        let caller = self.require_caller()?;
        let config = &self.session.config;

        let balances = match self.mode {
            ExecutionMode::Simulated => {
                let balances = WalletBalances::simulated(config);
                self.trail.push(
                    Severity::Warning,
                    Operation::Balances,
                    format!("Simulated balances {balances}"),
                    None,
                );
                balances
            }
            ExecutionMode::Live => {
                let payment = self
                    .executor
                    .balance_of(&caller, &config.payment_asset)
                    .await;
                let secondary = self
                    .executor
                    .balance_of(&caller, &config.secondary_asset)
                    .await;
                match (payment, secondary) {
                    (Ok(payment), Ok(secondary)) => {
                        let balances = WalletBalances {
                            payment_asset: config.payment_asset.clone(),
                            payment,
                            secondary_asset: config.secondary_asset.clone(),
                            secondary,
                        };
                        self.trail.push(
                            Severity::Info,
                            Operation::Balances,
                            format!("Balances {balances}"),
                            None,
                        );
                        balances
                    }
                    (Err(err), _) | (_, Err(err)) => {
                        tracing::warn!(caller = %caller, error = %err, "Balance read failed");
                        self.trail.push(
                            Severity::Warning,
                            Operation::Balances,
                            format!("Balance read failed: {err}"),
                            None,
                        );
                        return Ok(None);
                    }
                }
            }
        };

        self.session.wallet_balances = Some(balances.clone());
        Ok(Some(balances))
    }

    // =====================================================================
    // Payments and settlement
    // =====================================================================

    /// Send one memo-tagged payment of the payment asset.
    ///
    /// `to_identifier` is a `0x` address or a handle resolved to its
    /// pseudo-address. A blank `memo` falls back to the configured default.
    ///
    /// # Errors
    /// - `CallerAddressRequired` if no caller wallet is set
    /// - `MissingField` if the recipient is blank
    /// - `InvalidAmount` if `amount_minor_units` is not positive
    pub async fn send_payment(
        &mut self,
        to_identifier: &str,
        amount_minor_units: MinorUnits,
        memo: Option<&str>,
        fee_sponsored: bool,
    ) -> Result<ExecutionOutcome> {
        self.require_caller()?;
        let to_identifier = to_identifier.trim();
        if to_identifier.is_empty() {
            return Err(TempoPilotError::MissingField("recipient"));
        }
        if amount_minor_units <= 0 {
            return Err(TempoPilotError::InvalidAmount {
                reason: format!("payment must be > 0, got {amount_minor_units}"),
            });
        }
        let amount_units = self.token_units(amount_minor_units)?;

        let to = resolve_address(to_identifier);
        let memo_text = memo
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.session.config.default_memo.as_str())
            .to_string();
        let request = TransferRequest {
            to: to.clone(),
            amount_minor_units,
            amount_units,
            asset: self.session.config.payment_asset.clone(),
            memo: Memo::from_text(&memo_text),
            fee_sponsored,
        };

        let what = format!(
            "payment ${} -> {to}",
            money::to_decimal_string(amount_minor_units)
        );
        let result = self.executor.transfer(request).await;
        Ok(self.record_commit(
            Operation::Payment,
            &what,
            AuditMeta::default().with_memo(memo_text),
            result,
        ))
    }

    /// Execute the legs of a settlement plan that `caller` owes.
    ///
    /// Legs run in plan order, one at a time. Legs whose debtor is not the
    /// caller are skipped without an audit entry. A failed leg is audited and
    /// the run continues with the next leg.
    ///
    /// Legs that committed in an earlier run of the same plan are counted as
    /// already settled and not submitted again, so a rerun after a partial
    /// failure only retries the legs that failed.
    ///
    /// # Errors
    /// - `NothingToSettle` if `legs` is empty
    /// - `AmountOverflow` if a payable leg cannot be expressed in token units
    pub async fn run_settlement(
        &mut self,
        legs: &[SettlementLeg],
        caller: &Address,
    ) -> Result<SettlementSummary> {
        if legs.is_empty() {
            return Err(TempoPilotError::NothingToSettle);
        }
        let payable = legs
            .iter()
            .map(|leg| {
                if leg.is_payable_by(caller) {
                    self.token_units(leg.amount_minor_units).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect::<Result<Vec<Option<u128>>>>()?;

        let plan: Vec<Transfer> = legs.iter().map(SettlementLeg::transfer).collect();
        let plan_root = plan_root_hex(&plan);
        let mut summary = SettlementSummary {
            executed_count: 0,
            failed_count: 0,
            skipped_count: 0,
            already_settled_count: 0,
            plan_root: plan_root.clone(),
        };

        for (index, (leg, amount_units)) in legs.iter().zip(payable).enumerate() {
            let Some(amount_units) = amount_units else {
                tracing::debug!(
                    leg = index,
                    debtor = %leg.from.name,
                    "Leg owed by another participant, skipped"
                );
                summary.skipped_count += 1;
                continue;
            };
            let key = LegKey::new(&plan_root, index);
            if self.settled.is_settled(&key) {
                tracing::info!(leg = index, plan_root = %plan_root, "Leg already settled");
                summary.already_settled_count += 1;
                continue;
            }

            let memo = leg.memo(Utc::now().timestamp_millis());
            let meta = AuditMeta::default()
                .with_memo(memo.text())
                .with_plan_root(plan_root.clone());
            let request = TransferRequest {
                to: leg.creditor_address(),
                amount_minor_units: leg.amount_minor_units,
                amount_units,
                asset: self.session.config.payment_asset.clone(),
                memo,
                fee_sponsored: false,
            };

            let result = self.executor.transfer(request).await;
            let what = format!("settlement {leg}");
            let outcome = self.record_commit(Operation::Settlement, &what, meta, result);
            if outcome.is_success() {
                self.settled.mark_settled(key)?;
                summary.executed_count += 1;
            } else {
                summary.failed_count += 1;
            }
        }

        tracing::info!(
            executed = summary.executed_count,
            failed = summary.failed_count,
            skipped = summary.skipped_count,
            already_settled = summary.already_settled_count,
            plan_root = %summary.plan_root,
            "Settlement run finished"
        );
        Ok(summary)
    }

    // =====================================================================
    // Quotes and swaps
    // =====================================================================

    /// Fetch a quote for selling `amount_in` whole units of `asset_in`.
    ///
    /// The previous quote is discarded before fetching, so after a failed
    /// request the session holds no quote.
    ///
    /// # Errors
    /// - `InvalidAmount` if `amount_in` is not positive or below one base unit
    /// - `InvalidQuote` if both assets are the same
    pub async fn quote(
        &mut self,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Decimal,
    ) -> Result<QuoteOutcome> {
        if amount_in <= Decimal::ZERO {
            return Err(TempoPilotError::InvalidAmount {
                reason: format!("quote amount must be > 0, got {amount_in}"),
            });
        }
        if asset_in == asset_out {
            return Err(TempoPilotError::InvalidQuote {
                reason: format!("cannot swap {asset_in} for itself"),
            });
        }
        let decimals = self.session.config.token_decimals;
        let amount_in_units = money::decimal_to_token_units(amount_in, decimals)
            .filter(|units| *units > 0)
            .ok_or_else(|| TempoPilotError::InvalidAmount {
                reason: format!("{amount_in} is not representable in base units"),
            })?;

        self.session.last_quote = None;
        let fetched = match self
            .executor
            .get_quote(asset_in, asset_out, amount_in_units)
            .await
        {
            Ok(amount_out_units) => Quote::from_units(
                asset_in.clone(),
                asset_out.clone(),
                amount_in_units,
                amount_out_units,
                decimals,
            )
            .map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        let outcome = match fetched {
            Ok(quote) => {
                let (severity, prefix) = match self.mode {
                    ExecutionMode::Live => (Severity::Info, "Live"),
                    ExecutionMode::Simulated => (Severity::Warning, "Simulated"),
                };
                tracing::info!(
                    amount_in = %quote.amount_in,
                    amount_out = %quote.amount_out,
                    mode = %self.mode,
                    "Quote fetched"
                );
                self.trail.push(
                    severity,
                    Operation::Quote,
                    format!("{prefix} quote {quote}"),
                    None,
                );
                self.session.last_quote = Some(quote.clone());
                match self.mode {
                    ExecutionMode::Live => QuoteOutcome::Live { quote },
                    ExecutionMode::Simulated => QuoteOutcome::Simulated { quote },
                }
            }
            Err(reason) => {
                tracing::error!(error = %reason, "Quote failed");
                self.trail.push(
                    Severity::Error,
                    Operation::Quote,
                    format!("Quote failed: {reason}"),
                    None,
                );
                QuoteOutcome::Failed { reason }
            }
        };
        Ok(outcome)
    }

    /// Swap against the session's latest quote, behind the price guard.
    ///
    /// Without a quote, one is fetched first for the configured swap amount.
    /// A missing, stale or out-of-tolerance quote yields
    /// [`ExecutionOutcome::GuardBlocked`] and nothing is submitted.
    ///
    /// # Errors
    /// - `CallerAddressRequired` if no caller wallet is set
    /// - `InvalidBps` if either bps value exceeds 10000
    /// - validation errors of the automatic [`quote`](Self::quote)
    pub async fn execute_swap(
        &mut self,
        asset_in: &AssetId,
        asset_out: &AssetId,
        slippage_bps: u32,
        impact_tolerance_bps: u32,
    ) -> Result<ExecutionOutcome> {
        self.require_caller()?;
        let guard = PriceGuard::new(impact_tolerance_bps)?;
        if slippage_bps > BPS_DENOMINATOR {
            return Err(TempoPilotError::InvalidBps {
                value: slippage_bps,
            });
        }

        if self.session.last_quote.is_none() {
            tracing::debug!("No quote in session, fetching one");
            let amount = self.session.config.swap.amount;
            self.quote(asset_in, asset_out, amount).await?;
        }

        let impact_bps = match guard.check(self.session.last_quote.as_ref(), asset_in, asset_out) {
            Ok(impact_bps) => impact_bps,
            Err(err) if err.is_guard_violation() => {
                let impact_bps = match &err {
                    TempoPilotError::PriceImpactExceeded { impact_bps, .. } => Some(*impact_bps),
                    _ => None,
                };
                self.trail
                    .push(Severity::Error, Operation::Swap, err.to_string(), None);
                return Ok(ExecutionOutcome::GuardBlocked {
                    impact_bps,
                    tolerance_bps: impact_tolerance_bps,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };
        let Some(quote) = self.session.last_quote.clone() else {
            return Err(TempoPilotError::QuoteMissing);
        };

        let min_out = min_amount_out(quote.amount_out_units, slippage_bps)?;
        let request = SwapRequest {
            asset_in: asset_in.clone(),
            asset_out: asset_out.clone(),
            amount_in_units: quote.amount_in_units,
            min_amount_out_units: min_out,
        };
        let what = format!(
            "swap {} {asset_in} -> {asset_out} (impact {impact_bps}bps, min out {min_out})",
            quote.amount_in
        );
        let result = self.executor.swap(request).await;
        Ok(self.record_commit(Operation::Swap, &what, AuditMeta::default(), result))
    }

    // =====================================================================
    // Internal
    // =====================================================================

    fn require_caller(&self) -> Result<Address> {
        self.session
            .caller()
            .cloned()
            .ok_or(TempoPilotError::CallerAddressRequired)
    }

    fn token_units(&self, amount_minor_units: MinorUnits) -> Result<u128> {
        let decimals = self.session.config.token_decimals;
        money::to_token_units(amount_minor_units, decimals).ok_or_else(|| {
            TempoPilotError::AmountOverflow {
                reason: format!("{amount_minor_units} minor units at {decimals} decimals"),
            }
        })
    }

    /// Turn an executor result into an outcome and its audit entry.
    fn record_commit(
        &mut self,
        operation: Operation,
        what: &str,
        meta: AuditMeta,
        result: ExecutorResult<TxReference>,
    ) -> ExecutionOutcome {
        match result {
            Ok(tx) => {
                let meta = AuditMeta {
                    tx: Some(tx.clone()),
                    ..meta
                };
                match self.mode {
                    ExecutionMode::Live => {
                        tracing::info!(operation = %operation, tx = %tx, "Committed {what}");
                        self.trail.push(
                            Severity::Info,
                            operation,
                            format!("Committed {what}"),
                            Some(meta),
                        );
                        ExecutionOutcome::Committed { tx }
                    }
                    ExecutionMode::Simulated => {
                        tracing::warn!(operation = %operation, tx = %tx, "Simulated {what}");
                        self.trail.push(
                            Severity::Warning,
                            operation,
                            format!("Simulated {what}"),
                            Some(meta),
                        );
                        ExecutionOutcome::Simulated { tx }
                    }
                }
            }
            Err(err) => {
                tracing::error!(operation = %operation, error = %err, "Failed {what}");
                self.trail.push(
                    Severity::Error,
                    operation,
                    format!("Failed {what}: {err}"),
                    Some(meta),
                );
                ExecutionOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempopilot_ledger::Ledger;
    use tempopilot_types::SessionConfig;

    use super::*;
    use crate::executor::{ExecutorError, ScriptedExecutor};

    const AVA: &str = "0x031891A61200FedDd622EbACC10734BC90093B2A";

    async fn simulated() -> Orchestrator {
        let session = SessionContext::default();
        let mut orchestrator = Orchestrator::start(session, None).await.unwrap();
        orchestrator.set_caller(AVA).unwrap();
        orchestrator
    }

    async fn live(executor: impl TransferExecutor + 'static) -> Orchestrator {
        let mut orchestrator =
            Orchestrator::start(SessionContext::default(), Some(Box::new(executor)))
                .await
                .unwrap();
        orchestrator.set_caller(AVA).unwrap();
        orchestrator
    }

    #[tokio::test]
    async fn mode_selected_once_at_start() {
        let orchestrator = Orchestrator::start(SessionContext::default(), None).await.unwrap();
        assert_eq!(orchestrator.mode(), ExecutionMode::Simulated);
        let entry = orchestrator.audit_trail().latest().unwrap();
        assert_eq!(entry.operation, Operation::Session);
        assert_eq!(entry.severity, Severity::Warning);

        let unreachable: Box<dyn TransferExecutor> = Box::new(ScriptedExecutor::unreachable());
        let orchestrator = Orchestrator::start(SessionContext::default(), Some(unreachable))
            .await
            .unwrap();
        assert_eq!(orchestrator.mode(), ExecutionMode::Simulated);

        let orchestrator = live(ScriptedExecutor::new(42_431)).await;
        assert_eq!(orchestrator.mode(), ExecutionMode::Live);
    }

    #[tokio::test]
    async fn invalid_config_refused() {
        let mut config = SessionConfig::default();
        config.audit_capacity = 0;
        let err = Orchestrator::start(SessionContext::new(config), None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, TempoPilotError::Configuration(_)));
    }

    #[tokio::test]
    async fn network_check_statuses() {
        let mut orchestrator = simulated().await;
        assert_eq!(orchestrator.check_network().await, NetworkStatus::Simulated);

        let mut orchestrator = live(ScriptedExecutor::new(42_431)).await;
        assert_eq!(
            orchestrator.check_network().await,
            NetworkStatus::Ready { network_id: 42_431 }
        );

        let mut orchestrator = live(ScriptedExecutor::new(1)).await;
        assert_eq!(
            orchestrator.check_network().await,
            NetworkStatus::WrongNetwork {
                expected: 42_431,
                actual: 1
            }
        );
        assert_eq!(
            orchestrator.session().network_status,
            NetworkStatus::WrongNetwork {
                expected: 42_431,
                actual: 1
            }
        );
    }

    #[tokio::test]
    async fn validation_errors_are_not_audited() {
        let mut orchestrator = simulated().await;
        let before = orchestrator.audit_trail().len();

        let err = orchestrator.send_payment("sam", 0, None, false).await.unwrap_err();
        assert!(matches!(err, TempoPilotError::InvalidAmount { .. }));
        let err = orchestrator.send_payment("  ", 100, None, false).await.unwrap_err();
        assert!(matches!(err, TempoPilotError::MissingField("recipient")));
        let err = orchestrator
            .quote(&AssetId::alpha_usd(), &AssetId::alpha_usd(), Decimal::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, TempoPilotError::InvalidQuote { .. }));
        let err = orchestrator
            .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 10_001, 20)
            .await
            .unwrap_err();
        assert!(matches!(err, TempoPilotError::InvalidBps { value: 10_001 }));

        assert_eq!(orchestrator.audit_trail().len(), before);
    }

    #[tokio::test]
    async fn payment_requires_caller() {
        let mut orchestrator = Orchestrator::start(SessionContext::default(), None).await.unwrap();
        let err = orchestrator.send_payment("sam", 100, None, false).await.unwrap_err();
        assert!(matches!(err, TempoPilotError::CallerAddressRequired));
    }

    #[tokio::test]
    async fn simulated_payment_is_synthetic_and_warned() {
        let mut orchestrator = simulated().await;
        let outcome = orchestrator
            .send_payment("sam@example.com", 1_250, Some(""), true)
            .await
            .unwrap();
        let ExecutionOutcome::Simulated { tx } = &outcome else {
            panic!("expected simulated outcome, got {outcome:?}");
        };
        assert!(tx.is_synthetic());
        assert!(orchestrator.explorer_url(tx).is_none());

        let entry = orchestrator.audit_trail().latest().unwrap();
        assert_eq!(entry.severity, Severity::Warning);
        assert!(entry.message.starts_with("Simulated payment $12.50 -> 0x"));
        assert_eq!(
            entry.meta.as_ref().unwrap().memo.as_deref(),
            Some("TempoPilot Payment")
        );
    }

    #[tokio::test]
    async fn live_payment_passes_request_through() {
        let executor = Arc::new(ScriptedExecutor::new(42_431));
        let mut orchestrator = live(Arc::clone(&executor)).await;
        let outcome = orchestrator
            .send_payment("0x41A75fc9817AF9F2DB0c0e58C71Bc826339b3Acb", 2_500, Some("rent"), true)
            .await
            .unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Committed { .. }));
        assert!(
            outcome
                .explorer_url(&orchestrator.session().config.explorer_base)
                .unwrap()
                .starts_with("https://explore.tempo.xyz/tx/0x")
        );

        let sent = executor.transfers();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.as_str(), "0x41a75fc9817af9f2db0c0e58c71bc826339b3acb");
        assert_eq!(sent[0].amount_units, 25_000_000);
        assert_eq!(sent[0].memo.text(), "rent");
        assert!(sent[0].fee_sponsored);
    }

    #[tokio::test]
    async fn failed_payment_becomes_outcome() {
        let executor = ScriptedExecutor::new(42_431);
        executor.push_outcome(Err(ExecutorError::InsufficientFunds("balance 0".into())));
        let mut orchestrator = live(executor).await;
        let outcome = orchestrator.send_payment("sam", 100, None, false).await.unwrap();
        let ExecutionOutcome::Failed { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("TP_ERR_702"));
        assert_eq!(orchestrator.audit_trail().latest().unwrap().severity, Severity::Error);
    }

    #[tokio::test]
    async fn simulated_swap_auto_quotes_and_passes_guard() {
        let mut orchestrator = simulated().await;
        let outcome = orchestrator
            .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 20)
            .await
            .unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Simulated { .. }));

        let ops: Vec<Operation> = orchestrator
            .audit_trail()
            .entries()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops[ops.len() - 2..], [Operation::Quote, Operation::Swap]);
        let quote = orchestrator.session().last_quote.as_ref().unwrap();
        assert_eq!(quote.amount_out_units, 99_800_000);
    }

    #[tokio::test]
    async fn guard_blocks_excessive_impact() {
        let mut orchestrator = simulated().await;
        orchestrator
            .quote(&AssetId::alpha_usd(), &AssetId::beta_usd(), Decimal::from(100))
            .await
            .unwrap();
        let outcome = orchestrator
            .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 19)
            .await
            .unwrap();
        let ExecutionOutcome::GuardBlocked {
            impact_bps,
            tolerance_bps,
            reason,
        } = outcome
        else {
            panic!("expected guard refusal, got {outcome:?}");
        };
        assert_eq!(impact_bps, Some(Decimal::from(20)));
        assert_eq!(tolerance_bps, 19);
        assert!(reason.starts_with("TP_ERR_300: Guard blocked swap: impact 20"));
        let entry = orchestrator.audit_trail().latest().unwrap();
        assert_eq!(entry.operation, Operation::Swap);
        assert_eq!(entry.severity, Severity::Error);
    }

    #[tokio::test]
    async fn stale_quote_blocks_swap() {
        let mut orchestrator = simulated().await;
        orchestrator
            .quote(&AssetId::alpha_usd(), &AssetId::beta_usd(), Decimal::from(5))
            .await
            .unwrap();
        let outcome = orchestrator
            .execute_swap(&AssetId::beta_usd(), &AssetId::alpha_usd(), 50, 10_000)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            ExecutionOutcome::GuardBlocked { impact_bps: None, .. }
        ));
    }

    #[tokio::test]
    async fn live_swap_sends_slippage_floor() {
        let executor = Arc::new(ScriptedExecutor::new(42_431).with_quote_rate(999, 1_000));
        let mut orchestrator = live(Arc::clone(&executor)).await;
        orchestrator
            .quote(&AssetId::alpha_usd(), &AssetId::beta_usd(), Decimal::from(100))
            .await
            .unwrap();
        let outcome = orchestrator
            .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 20)
            .await
            .unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Committed { .. }));

        let swaps = executor.swaps();
        assert_eq!(swaps[0].amount_in_units, 100_000_000);
        assert_eq!(swaps[0].min_amount_out_units, 99_400_500);
    }

    #[tokio::test]
    async fn simulated_balances_refresh() {
        let mut orchestrator = simulated().await;
        let balances = orchestrator.refresh_balances().await.unwrap().unwrap();
        assert_eq!(balances.payment, 100_000_000);
        assert_eq!(orchestrator.session().wallet_balances, Some(balances));
    }

    #[tokio::test]
    async fn starter_group_settles_only_callers_legs() {
        let ledger = Ledger::starter();
        let legs = ledger.settlement_legs().unwrap();
        let mut orchestrator = simulated().await;
        let sam = Address::parse(Ledger::DEMO_WALLETS[2]).unwrap();

        let summary = orchestrator.run_settlement(&legs, &sam).await.unwrap();
        assert_eq!(summary.executed_count, 1);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.plan_root, plan_root_hex(&ledger.settlement_plan().unwrap()));

        let entry = orchestrator.audit_trail().latest().unwrap();
        assert_eq!(entry.operation, Operation::Settlement);
        assert_eq!(entry.message, "Simulated settlement Sam -> Ava $55.00");
        let meta = entry.meta.as_ref().unwrap();
        assert!(meta.memo.as_deref().unwrap().starts_with("SPLIT|Sam|Ava|"));
        assert_eq!(meta.plan_root.as_deref(), Some(summary.plan_root.as_str()));

        let err = orchestrator.run_settlement(&[], &sam).await.unwrap_err();
        assert!(matches!(err, TempoPilotError::NothingToSettle));
    }

    #[tokio::test]
    async fn rerun_does_not_pay_committed_leg_again() {
        let ledger = Ledger::starter();
        let legs = ledger.settlement_legs().unwrap();
        let executor = Arc::new(ScriptedExecutor::new(42_431));
        let mut orchestrator = live(Arc::clone(&executor)).await;
        let sam = orchestrator.set_caller(Ledger::DEMO_WALLETS[2]).unwrap();

        let first = orchestrator.run_settlement(&legs, &sam).await.unwrap();
        assert_eq!(first.executed_count, 1);
        assert_eq!(first.already_settled_count, 0);
        let audited = orchestrator.audit_trail().len();

        let second = orchestrator.run_settlement(&legs, &sam).await.unwrap();
        assert_eq!(second.executed_count, 0);
        assert_eq!(second.failed_count, 0);
        assert_eq!(second.skipped_count, 1);
        assert_eq!(second.already_settled_count, 1);
        assert_eq!(second.plan_root, first.plan_root);

        assert_eq!(executor.transfers().len(), 1, "the $55.00 leg was paid once");
        assert_eq!(orchestrator.audit_trail().len(), audited);
    }

    #[tokio::test]
    async fn failed_leg_is_retried_on_rerun() {
        let ledger = Ledger::starter();
        let legs = ledger.settlement_legs().unwrap();
        let executor = Arc::new(ScriptedExecutor::new(42_431));
        executor.push_outcome(Err(ExecutorError::Timeout("no receipt".into())));
        let mut orchestrator = live(Arc::clone(&executor)).await;
        let sam = orchestrator.set_caller(Ledger::DEMO_WALLETS[2]).unwrap();

        let first = orchestrator.run_settlement(&legs, &sam).await.unwrap();
        assert_eq!(first.failed_count, 1);

        let second = orchestrator.run_settlement(&legs, &sam).await.unwrap();
        assert_eq!(second.executed_count, 1);
        assert_eq!(second.already_settled_count, 0);

        let third = orchestrator.run_settlement(&legs, &sam).await.unwrap();
        assert_eq!(third.executed_count, 0);
        assert_eq!(third.already_settled_count, 1);
        assert_eq!(executor.transfers().len(), 2);
    }

    #[tokio::test]
    async fn unmeasurable_impact_blocks_swap() {
        let executor = Arc::new(ScriptedExecutor::new(42_431).with_quote_rate(10u128.pow(28), 1));
        let mut orchestrator = live(Arc::clone(&executor)).await;
        let quote = orchestrator
            .quote(&AssetId::alpha_usd(), &AssetId::beta_usd(), Decimal::new(1, 6))
            .await
            .unwrap();
        assert!(matches!(quote, QuoteOutcome::Live { .. }));

        let outcome = orchestrator
            .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 20)
            .await
            .unwrap();
        let ExecutionOutcome::GuardBlocked { impact_bps, reason, .. } = outcome else {
            panic!("expected guard refusal, got {outcome:?}");
        };
        assert_eq!(impact_bps, None);
        assert!(reason.starts_with("TP_ERR_303"));
        assert!(executor.swaps().is_empty());
        let entry = orchestrator.audit_trail().latest().unwrap();
        assert_eq!(entry.operation, Operation::Swap);
        assert_eq!(entry.severity, Severity::Error);
    }
}
