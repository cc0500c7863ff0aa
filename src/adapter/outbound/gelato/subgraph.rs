//! GraphQL client for the Gelato limit-order subgraph.

use std::time::Duration;

use alloy_primitives::Address;
use reqwest::Client as HttpClient;
use serde_json::json;
use tracing::{debug, warn};

use super::dto::{GraphResponse, OrdersData, ORDERS_BY_OWNER};
use crate::domain::HistoricalOrder;
use crate::error::{HistoryError, Result};

pub struct SubgraphClient {
    http: HttpClient,
    url: String,
}

impl SubgraphClient {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });
        Self {
            http,
            url: url.into(),
        }
    }

    /// Orders placed by `owner`, newest first.
    pub async fn orders_by_owner(&self, owner: Address) -> Result<Vec<HistoricalOrder>> {
        // The subgraph stores owners lowercased.
        let owner = owner.to_string().to_lowercase();
        debug!(owner = %owner, url = %self.url, "Querying order subgraph");

        let body = json!({
            "query": ORDERS_BY_OWNER,
            "variables": { "owner": owner },
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| HistoryError::Query(e.to_string()))?;

        let parsed: GraphResponse<OrdersData> = response
            .json()
            .await
            .map_err(|e| HistoryError::InvalidResponse(e.to_string()))?;

        Ok(parsed.into_orders()?)
    }
}
