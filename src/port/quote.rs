//! Quote port for market-rate lookups.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use crate::error::Result;

/// Raw answer from a quote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteResponse {
    /// A priced route, amounts in base units.
    Route { src_amount: U256, dest_amount: U256 },
    /// The service answered with an error payload.
    Rejected { message: String },
}

/// Port for fetching market quotes.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Errors
///
/// Transport-level failures are returned as errors. A well-formed refusal
/// from the service is a [`QuoteResponse::Rejected`], not an error.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Price selling `src_amount` base units of `src` for `dest`.
    async fn get_rate(&self, src: Address, dest: Address, src_amount: U256)
        -> Result<QuoteResponse>;

    /// Return the service name for logging.
    fn source_name(&self) -> &'static str;
}
