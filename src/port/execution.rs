//! Execution-network port: approvals, limit-order submission, order history.

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::domain::HistoricalOrder;
use crate::error::Result;

/// Port for a limit-order execution network.
///
/// Implementations hold whatever signer they need; the account that
/// submits is the implementation's own.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Errors
///
/// Approval and submission failures are reported as
/// [`SubmissionError`](crate::error::SubmissionError); history failures as
/// [`HistoryError`](crate::error::HistoryError).
#[async_trait]
pub trait ExecutionNetwork: Send + Sync {
    /// Allow the network to spend `amount` base units of `token`.
    async fn approve_token_amount(&self, token: Address, amount: U256) -> Result<()>;

    /// Place a sell order of exactly `amount` of `src` for at least
    /// `min_return` of `dest`.
    async fn submit_limit_order(
        &self,
        src: Address,
        dest: Address,
        amount: U256,
        min_return: U256,
    ) -> Result<TxHash>;

    /// All orders owned by `account`.
    async fn get_orders(&self, account: Address) -> Result<Vec<HistoricalOrder>>;

    /// Return the network name for logging.
    fn network_name(&self) -> &'static str;
}
