//! Simulated executor.
//!
//! Succeeds deterministically without contacting any external system.
//! References are synthetic (`0xsim` + a zero-padded sequence number), so they
//! never produce explorer links.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tempopilot_types::constants::{
    SIMULATED_BALANCE_MINOR, SIMULATED_QUOTE_RATE_DEN, SIMULATED_QUOTE_RATE_NUM,
};
use tempopilot_types::{Address, AssetId, MinorUnits, TxReference};

use crate::executor::{
    ExecutorError, ExecutorResult, SwapRequest, TransferExecutor, TransferRequest,
};

/// Executor used in simulated mode.
#[derive(Debug)]
pub struct SimulatedExecutor {
    network_id: u64,
    sequence: AtomicU64,
}

impl SimulatedExecutor {
    /// Simulated executor reporting `network_id` as its network.
    #[must_use]
    pub fn new(network_id: u64) -> Self {
        Self {
            network_id,
            sequence: AtomicU64::new(0),
        }
    }

    fn next_reference(&self) -> TxReference {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        TxReference::synthetic(sequence)
    }
}

#[async_trait]
impl TransferExecutor for SimulatedExecutor {
    async fn current_network_id(&self) -> ExecutorResult<u64> {
        Ok(self.network_id)
    }

    async fn balance_of(&self, _owner: &Address, _asset: &AssetId) -> ExecutorResult<MinorUnits> {
        Ok(SIMULATED_BALANCE_MINOR)
    }

    async fn transfer(&self, request: TransferRequest) -> ExecutorResult<TxReference> {
        tracing::debug!(
            to = %request.to,
            amount = request.amount_minor_units,
            "Simulated transfer"
        );
        Ok(self.next_reference())
    }

    async fn get_quote(
        &self,
        _asset_in: &AssetId,
        _asset_out: &AssetId,
        amount_in_units: u128,
    ) -> ExecutorResult<u128> {
        amount_in_units
            .checked_mul(SIMULATED_QUOTE_RATE_NUM)
            .map(|scaled| scaled / SIMULATED_QUOTE_RATE_DEN)
            .ok_or_else(|| ExecutorError::Other(format!("quote for {amount_in_units} overflows")))
    }

    async fn swap(&self, request: SwapRequest) -> ExecutorResult<TxReference> {
        tracing::debug!(amount_in = request.amount_in_units, "Simulated swap");
        Ok(self.next_reference())
    }
}
