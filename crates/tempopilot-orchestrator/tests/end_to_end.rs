//! Integration test: session lifecycle
//!
//! START → CHECK NETWORK → PAY → SETTLE → QUOTE → SWAP
//!
//! Drives the orchestrator against a live-style executor that fails on
//! chosen calls, and against the simulated executor.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tempopilot_ledger::Ledger;
use tempopilot_orchestrator::*;
use tempopilot_types::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Live-style executor whose n-th transfer (1-based) fails when listed.
struct FlakyExecutor {
    network_id: u64,
    failing_calls: HashSet<usize>,
    calls: Mutex<Vec<TransferRequest>>,
}

impl FlakyExecutor {
    fn new(failing_calls: &[usize]) -> Self {
        Self {
            network_id: constants::EXPECTED_NETWORK_ID,
            failing_calls: failing_calls.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TransferExecutor for FlakyExecutor {
    async fn current_network_id(&self) -> ExecutorResult<u64> {
        Ok(self.network_id)
    }

    async fn balance_of(&self, _owner: &Address, _asset: &AssetId) -> ExecutorResult<MinorUnits> {
        Err(ExecutorError::Unreachable("rpc down".into()))
    }

    async fn transfer(&self, request: TransferRequest) -> ExecutorResult<TxReference> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(request);
        let n = calls.len();
        if self.failing_calls.contains(&n) {
            return Err(ExecutorError::Rejected(format!("call {n} reverted")));
        }
        Ok(TxReference::new(format!("0x{n:064x}")))
    }

    async fn get_quote(
        &self,
        _asset_in: &AssetId,
        _asset_out: &AssetId,
        amount_in_units: u128,
    ) -> ExecutorResult<u128> {
        // 3% off parity
        Ok(amount_in_units * 97 / 100)
    }

    async fn swap(&self, _request: SwapRequest) -> ExecutorResult<TxReference> {
        Ok(TxReference::new("0xswap"))
    }
}

const CALLER: &str = "0x031891A61200FedDd622EbACC10734BC90093B2A";
const OTHER: &str = "0x41A75fc9817AF9F2DB0c0e58C71Bc826339b3Acb";

fn leg(from: &Participant, to: &Participant, amount: MinorUnits) -> SettlementLeg {
    SettlementLeg {
        from: from.clone(),
        to: to.clone(),
        amount_minor_units: amount,
    }
}

async fn live_session(executor: FlakyExecutor) -> Orchestrator {
    let mut orchestrator =
        Orchestrator::start(SessionContext::default(), Some(Box::new(executor)))
            .await
            .unwrap();
    assert_eq!(orchestrator.mode(), ExecutionMode::Live);
    orchestrator.set_caller(CALLER).unwrap();
    orchestrator
}

#[tokio::test]
async fn partial_settlement_batch() {
    init_tracing();
    let caller = Participant::dummy_with_address("Ava", CALLER);
    let other = Participant::dummy_with_address("Sam", OTHER);
    let creditor = Participant::dummy("Neil");

    // Caller owes legs 1 and 3; leg 3 is the caller's second transfer.
    let legs = vec![
        leg(&caller, &creditor, 3_000),
        leg(&other, &creditor, 2_000),
        leg(&caller, &other, 1_000),
    ];
    let mut orchestrator = live_session(FlakyExecutor::new(&[2])).await;

    let summary = orchestrator
        .run_settlement(&legs, &Address::parse(CALLER).unwrap())
        .await
        .unwrap();

    assert_eq!(summary.executed_count, 1);
    assert_eq!(summary.failed_count, 1);
    assert_eq!(summary.skipped_count, 1);

    let settlement: Vec<&AuditEntry> = orchestrator
        .audit_trail()
        .for_operation(Operation::Settlement)
        .collect();
    assert_eq!(settlement.len(), 2, "one entry per attempted leg");
    assert_eq!(settlement[0].severity, Severity::Info);
    assert!(settlement[0].tx().is_some());
    assert_eq!(settlement[1].severity, Severity::Error);
    assert!(settlement[1].message.contains("Ava -> Sam $10.00"));
    assert!(settlement[1].message.contains("TP_ERR_701"));
    for entry in settlement {
        assert_eq!(
            entry.meta.as_ref().unwrap().plan_root.as_deref(),
            Some(summary.plan_root.as_str())
        );
    }

    // Rerunning the same plan only retries the failed leg.
    let rerun = orchestrator
        .run_settlement(&legs, &Address::parse(CALLER).unwrap())
        .await
        .unwrap();
    assert_eq!(rerun.executed_count, 1);
    assert_eq!(rerun.failed_count, 0);
    assert_eq!(rerun.already_settled_count, 1);
    assert_eq!(rerun.plan_root, summary.plan_root);

    let retried: Vec<&AuditEntry> = orchestrator
        .audit_trail()
        .for_operation(Operation::Settlement)
        .collect();
    assert_eq!(retried.len(), 3);
    assert_eq!(retried[2].severity, Severity::Info);
    assert!(retried[2].message.contains("Ava -> Sam $10.00"));
}

#[tokio::test]
async fn settlement_legs_follow_plan_order_and_memo_format() {
    init_tracing();
    let executor = std::sync::Arc::new(FlakyExecutor::new(&[]));
    let mut orchestrator = Orchestrator::start(
        SessionContext::default(),
        Some(Box::new(std::sync::Arc::clone(&executor))),
    )
    .await
    .unwrap();

    let mut ledger = Ledger::new();
    let ava = ledger.add_participant("Ava", CALLER).unwrap();
    let neil = ledger.add_participant("Neil", "neil@example.com").unwrap();
    let sam = ledger.add_participant("Sam", "sam@example.com").unwrap();
    ledger.add_expense("Rent", 90_000, neil, &[ava, neil]).unwrap();
    ledger.add_expense("Power", 30_000, sam, &[ava, sam]).unwrap();
    let legs = ledger.settlement_legs().unwrap();
    assert_eq!(legs.len(), 2);
    assert!(legs.iter().all(|l| l.from.id == ava));
    assert_eq!(legs[0].to.name, "Neil");

    let summary = orchestrator
        .run_settlement(&legs, &Address::parse(CALLER).unwrap())
        .await
        .unwrap();
    assert_eq!(summary.executed_count, legs.len());

    let calls = executor.calls.lock().unwrap();
    for (call, leg) in calls.iter().zip(&legs) {
        assert_eq!(call.to, leg.creditor_address());
        assert_eq!(call.amount_minor_units, leg.amount_minor_units);
        let memo = call.memo.text();
        assert!(memo.starts_with(&format!("SPLIT|Ava|{}|", leg.to.name)));
    }
}

#[tokio::test]
async fn live_guard_blocks_off_parity_quote() {
    init_tracing();
    let mut orchestrator = live_session(FlakyExecutor::new(&[])).await;

    let quote = orchestrator
        .quote(&AssetId::alpha_usd(), &AssetId::beta_usd(), Decimal::from(10))
        .await
        .unwrap();
    assert!(matches!(quote, QuoteOutcome::Live { .. }));

    let outcome = orchestrator
        .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 299)
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        ExecutionOutcome::GuardBlocked { tolerance_bps: 299, .. }
    ));

    // Exactly at the measured impact the guard lets the swap through.
    let outcome = orchestrator
        .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 300)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ExecutionOutcome::Committed {
            tx: TxReference::new("0xswap")
        }
    );
}

#[tokio::test]
async fn balance_failure_is_a_warning() {
    init_tracing();
    let mut orchestrator = live_session(FlakyExecutor::new(&[])).await;
    assert!(orchestrator.refresh_balances().await.unwrap().is_none());
    let entry = orchestrator.audit_trail().latest().unwrap();
    assert_eq!(entry.operation, Operation::Balances);
    assert_eq!(entry.severity, Severity::Warning);
    assert!(entry.message.starts_with("Balance read failed"));
    assert!(orchestrator.session().wallet_balances.is_none());
}

#[tokio::test]
async fn simulated_journey_completes() {
    init_tracing();
    let mut orchestrator = Orchestrator::start(SessionContext::default(), None)
        .await
        .unwrap();
    assert_eq!(orchestrator.progress().next_step(), NextStep::SetWallet);

    let ledger = Ledger::starter();
    orchestrator.set_caller(Ledger::DEMO_WALLETS[1]).unwrap();
    assert_eq!(orchestrator.progress().next_step(), NextStep::CheckNetwork);

    assert_eq!(orchestrator.check_network().await, NetworkStatus::Simulated);
    assert_eq!(orchestrator.progress().next_step(), NextStep::SendFirstPayment);

    let outcome = orchestrator
        .send_payment("sam", 500, Some("coffee"), false)
        .await
        .unwrap();
    assert!(matches!(outcome, ExecutionOutcome::Simulated { .. }));
    assert_eq!(orchestrator.progress().next_step(), NextStep::RunQuoteOrSwap);

    let neil = orchestrator.session().caller().unwrap().clone();
    let summary = orchestrator
        .run_settlement(&ledger.settlement_legs().unwrap(), &neil)
        .await
        .unwrap();
    assert_eq!(summary.executed_count, 1);

    let outcome = orchestrator
        .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, 20)
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert!(orchestrator.progress().is_complete());

    let trail = orchestrator.audit_trail();
    assert!(trail.entries().all(|e| e.severity == Severity::Warning));
    assert!(
        trail
            .entries()
            .filter_map(AuditEntry::tx)
            .all(TxReference::is_synthetic)
    );
    let json: serde_json::Value = serde_json::from_str(&trail.to_json().unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), trail.len());
}

#[tokio::test]
async fn config_from_toml_drives_session() {
    let config = SessionConfig::from_toml_str(
        r#"
        expected_network_id = 7
        default_memo = "Team lunch"

        [swap]
        impact_tolerance_bps = 5
        "#,
    )
    .unwrap();
    let mut orchestrator = Orchestrator::start(SessionContext::new(config), None)
        .await
        .unwrap();
    orchestrator.set_caller(CALLER).unwrap();

    orchestrator.send_payment("sam", 100, None, false).await.unwrap();
    let memo = orchestrator.audit_trail().latest().unwrap().meta.clone().unwrap().memo;
    assert_eq!(memo.as_deref(), Some("Team lunch"));

    let tolerance = orchestrator.session().config.swap.impact_tolerance_bps;
    let outcome = orchestrator
        .execute_swap(&AssetId::alpha_usd(), &AssetId::beta_usd(), 50, tolerance)
        .await
        .unwrap();
    assert!(matches!(outcome, ExecutionOutcome::GuardBlocked { .. }));
}
