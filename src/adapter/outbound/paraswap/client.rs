//! HTTP client for the ParaSwap `/prices` endpoint.

use std::time::Duration;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};
use url::Url;

use super::dto::PricesResponse;
use crate::app::config::QuoteConfig;
use crate::domain::amount::TOKEN_DECIMALS;
use crate::error::{QuoteError, Result};
use crate::port::{QuoteResponse, QuoteSource};

/// Sell-side price lookups against ParaSwap.
pub struct ParaSwapClient {
    http: HttpClient,
    base_url: String,
    chain_id: u64,
}

impl ParaSwapClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            chain_id,
        }
    }

    #[must_use]
    pub fn from_config(config: &QuoteConfig, chain_id: u64) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.api_url.clone(),
            chain_id,
        }
    }

    /// `/prices` URL for selling `amount` of `src` into `dest`.
    pub fn prices_url(&self, src: Address, dest: Address, amount: U256) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let decimals = TOKEN_DECIMALS.to_string();
        let url = Url::parse_with_params(
            &format!("{base}/prices"),
            &[
                ("srcToken", src.to_checksum(None)),
                ("destToken", dest.to_checksum(None)),
                ("amount", amount.to_string()),
                ("srcDecimals", decimals.clone()),
                ("destDecimals", decimals),
                ("side", "SELL".to_string()),
                ("network", self.chain_id.to_string()),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl QuoteSource for ParaSwapClient {
    async fn get_rate(&self, src: Address, dest: Address, src_amount: U256) -> Result<QuoteResponse> {
        let url = self.prices_url(src, dest, src_amount)?;
        debug!(url = %url, "Fetching price route");

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Transport(format!("request timed out: {e}"))
            } else {
                QuoteError::Transport(e.to_string())
            }
        })?;

        // Rejections arrive as non-2xx responses with a JSON error body.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Transport(e.to_string()))?;

        let parsed: PricesResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                QuoteError::InvalidResponse(e.to_string())
            } else {
                QuoteError::Transport(format!("HTTP {status}"))
            }
        })?;

        let quote = parsed.into_quote()?;
        if let QuoteResponse::Rejected { message } = &quote {
            debug!(status = %status, message = %message, "Quote rejected");
        }
        Ok(quote)
    }

    fn source_name(&self) -> &'static str {
        "paraswap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn prices_url_carries_sell_parameters() {
        let client = ParaSwapClient::new("https://apiv5.paraswap.io/", 137);
        let url = client
            .prices_url(
                address!("8f3cf7ad23cd3cadbd9735aff958023239c6a063"),
                address!("42d61d766b85431666b39b89c43011f24451bff6"),
                U256::from(1_000_000_000_000_000_000u128),
            )
            .unwrap();

        assert_eq!(url.path(), "/prices");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("srcToken"), "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063");
        assert_eq!(get("amount"), "1000000000000000000");
        assert_eq!(get("srcDecimals"), "18");
        assert_eq!(get("destDecimals"), "18");
        assert_eq!(get("side"), "SELL");
        assert_eq!(get("network"), "137");
    }
}
