//! The transfer executor capability.
//!
//! The orchestrator depends only on [`TransferExecutor`]. A live
//! implementation talks to the settlement network; [`SimulatedExecutor`]
//! answers locally. Executors report failures as [`ExecutorError`] and never
//! interpret them beyond a message; the orchestrator turns them into outcomes.
//!
//! [`SimulatedExecutor`]: crate::SimulatedExecutor

use std::sync::Arc;

use async_trait::async_trait;
use tempopilot_types::{Address, AssetId, Memo, MinorUnits, TxReference};
use thiserror::Error;

/// Failures reported by an executor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    /// Network or node unreachable.
    #[error("TP_ERR_700: Executor unreachable: {0}")]
    Unreachable(String),

    /// The network rejected the transaction.
    #[error("TP_ERR_701: Transaction rejected: {0}")]
    Rejected(String),

    #[error("TP_ERR_702: Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Raised by the executor itself; the orchestrator imposes no timeout.
    #[error("TP_ERR_703: Executor timed out: {0}")]
    Timeout(String),

    #[error("TP_ERR_799: Executor error: {0}")]
    Other(String),
}

pub type ExecutorResult<T> = std::result::Result<T, ExecutorError>;

/// A single memo-tagged token transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    pub amount_minor_units: MinorUnits,
    /// The same amount in token base units.
    pub amount_units: u128,
    pub asset: AssetId,
    pub memo: Memo,
    /// Ask the network to sponsor the fee.
    pub fee_sponsored: bool,
}

/// A sell of `amount_in_units` of `asset_in` with an output floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in_units: u128,
    pub min_amount_out_units: u128,
}

/// Capability that moves (or pretends to move) value.
///
/// Every method resolves only once the underlying action has completed or
/// failed; transfers and swaps resolve with the receipt's reference.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    /// Id of the network the executor is connected to.
    async fn current_network_id(&self) -> ExecutorResult<u64>;

    /// Read-only balance of `owner` in `asset`, in minor units.
    async fn balance_of(&self, owner: &Address, asset: &AssetId) -> ExecutorResult<MinorUnits>;

    async fn transfer(&self, request: TransferRequest) -> ExecutorResult<TxReference>;

    /// Output base units for selling `amount_in_units` of `asset_in`.
    async fn get_quote(
        &self,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in_units: u128,
    ) -> ExecutorResult<u128>;

    async fn swap(&self, request: SwapRequest) -> ExecutorResult<TxReference>;
}

#[async_trait]
impl<T: TransferExecutor + ?Sized> TransferExecutor for Arc<T> {
    async fn current_network_id(&self) -> ExecutorResult<u64> {
        (**self).current_network_id().await
    }

    async fn balance_of(&self, owner: &Address, asset: &AssetId) -> ExecutorResult<MinorUnits> {
        (**self).balance_of(owner, asset).await
    }

    async fn transfer(&self, request: TransferRequest) -> ExecutorResult<TxReference> {
        (**self).transfer(request).await
    }

    async fn get_quote(
        &self,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in_units: u128,
    ) -> ExecutorResult<u128> {
        (**self).get_quote(asset_in, asset_out, amount_in_units).await
    }

    async fn swap(&self, request: SwapRequest) -> ExecutorResult<TxReference> {
        (**self).swap(request).await
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use scripted::ScriptedExecutor;

#[cfg(any(test, feature = "test-helpers"))]
mod scripted {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Live-style executor whose transfer and swap results are scripted in
    /// advance. Unscripted calls succeed with sequential references.
    pub struct ScriptedExecutor {
        network_id: ExecutorResult<u64>,
        quote_rate: (u128, u128),
        outcomes: Mutex<VecDeque<ExecutorResult<()>>>,
        requests: Mutex<Vec<TransferRequest>>,
        swaps: Mutex<Vec<SwapRequest>>,
        sequence: Mutex<u64>,
    }

    impl ScriptedExecutor {
        /// Executor on `network_id` quoting at parity.
        pub fn new(network_id: u64) -> Self {
            Self {
                network_id: Ok(network_id),
                quote_rate: (1, 1),
                outcomes: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
                swaps: Mutex::new(Vec::new()),
                sequence: Mutex::new(0),
            }
        }

        /// Executor whose network probe fails.
        pub fn unreachable() -> Self {
            Self {
                network_id: Err(ExecutorError::Unreachable("connection refused".into())),
                ..Self::new(0)
            }
        }

        /// Quote `amount * numerator / denominator`.
        pub fn with_quote_rate(mut self, numerator: u128, denominator: u128) -> Self {
            self.quote_rate = (numerator, denominator);
            self
        }

        /// Queue the result of the next transfer or swap.
        pub fn push_outcome(&self, outcome: ExecutorResult<()>) {
            self.outcomes.lock().unwrap().push_back(outcome);
        }

        pub fn transfers(&self) -> Vec<TransferRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn swaps(&self) -> Vec<SwapRequest> {
            self.swaps.lock().unwrap().clone()
        }

        fn next(&self) -> ExecutorResult<TxReference> {
            let scripted = self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()));
            scripted?;
            let mut sequence = self.sequence.lock().unwrap();
            *sequence += 1;
            Ok(TxReference::new(format!("0x{:064x}", *sequence)))
        }
    }

    #[async_trait]
    impl TransferExecutor for ScriptedExecutor {
        async fn current_network_id(&self) -> ExecutorResult<u64> {
            self.network_id.clone()
        }

        async fn balance_of(
            &self,
            _owner: &Address,
            _asset: &AssetId,
        ) -> ExecutorResult<MinorUnits> {
            Ok(4_200)
        }

        async fn transfer(&self, request: TransferRequest) -> ExecutorResult<TxReference> {
            self.requests.lock().unwrap().push(request);
            self.next()
        }

        async fn get_quote(
            &self,
            _asset_in: &AssetId,
            _asset_out: &AssetId,
            amount_in_units: u128,
        ) -> ExecutorResult<u128> {
            let (numerator, denominator) = self.quote_rate;
            amount_in_units
                .checked_mul(numerator)
                .map(|scaled| scaled / denominator)
                .ok_or_else(|| ExecutorError::Rejected("quote overflow".into()))
        }

        async fn swap(&self, request: SwapRequest) -> ExecutorResult<TxReference> {
            self.swaps.lock().unwrap().push(request);
            self.next()
        }
    }
}
