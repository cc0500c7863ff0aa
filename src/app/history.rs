//! Order history for the connected account.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::session::Session;
use crate::domain::HistoricalOrder;
use crate::error::{Error, HistoryError, Result};
use crate::port::ExecutionNetwork;

/// Reads past orders from the execution network.
pub struct OrderHistoryReader {
    network: Option<Arc<dyn ExecutionNetwork>>,
    timeout: Duration,
}

impl OrderHistoryReader {
    pub fn new(network: Option<Arc<dyn ExecutionNetwork>>, timeout: Duration) -> Self {
        Self { network, timeout }
    }

    /// Orders placed by `account`, in the order the network reports them.
    ///
    /// Without an account or network this is empty and nothing is queried.
    pub async fn fetch(&self, account: Option<Address>) -> Result<Vec<HistoricalOrder>> {
        let (Some(account), Some(network)) = (account, self.network.as_ref()) else {
            return Ok(Vec::new());
        };

        debug!(account = %account, network = network.network_name(), "Fetching orders");
        match tokio::time::timeout(self.timeout, network.get_orders(account)).await {
            Ok(Ok(orders)) => {
                debug!(count = orders.len(), "Fetched orders");
                Ok(orders)
            }
            Ok(Err(err @ Error::History(_))) => Err(err),
            Ok(Err(other)) => Err(HistoryError::Query(other.to_string()).into()),
            Err(_) => Err(HistoryError::Timeout {
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into()),
        }
    }

    /// Keep a published order list in step with `sessions`.
    ///
    /// Re-fetches whenever the session changes. A fetch still running when
    /// the session changes again is abandoned, so an older account's orders
    /// are never published over a newer one's. A failed fetch keeps the
    /// previous list only if it belongs to the same account; otherwise the
    /// list is cleared. The task ends when the session sender is dropped.
    pub fn follow(
        self: Arc<Self>,
        mut sessions: watch::Receiver<Session>,
    ) -> (watch::Receiver<Vec<HistoricalOrder>>, JoinHandle<()>) {
        let (orders_tx, orders_rx) = watch::channel(Vec::new());

        let handle = tokio::spawn(async move {
            // Account the published list belongs to.
            let mut shown: Option<Address> = None;
            loop {
                let account = sessions.borrow_and_update().account();
                tokio::select! {
                    result = self.fetch(account) => {
                        match result {
                            Ok(orders) => {
                                orders_tx.send_replace(orders);
                            }
                            Err(err) => {
                                warn!(error = %err, "Order history refresh failed");
                                if shown != account {
                                    orders_tx.send_replace(Vec::new());
                                }
                            }
                        }
                        shown = account;
                        if sessions.changed().await.is_err() {
                            break;
                        }
                    }
                    changed = sessions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        debug!("Session changed during fetch, restarting");
                    }
                }
            }
        });

        (orders_rx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{account, historical_order};
    use crate::testkit::network::RecordingNetwork;

    #[tokio::test]
    async fn no_account_means_no_query() {
        let network = Arc::new(RecordingNetwork::new());
        let reader = OrderHistoryReader::new(Some(network.clone()), Duration::from_secs(1));

        let orders = reader.fetch(None).await.unwrap();

        assert!(orders.is_empty());
        assert!(network.calls().is_empty());
    }

    #[tokio::test]
    async fn returns_orders_in_reported_order() {
        let network = Arc::new(RecordingNetwork::new());
        network.set_orders(vec![historical_order("b"), historical_order("a")]);
        let reader = OrderHistoryReader::new(Some(network.clone()), Duration::from_secs(1));

        let orders = reader.fetch(Some(account())).await.unwrap();

        let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn failures_surface_as_history_errors() {
        let network = Arc::new(RecordingNetwork::new());
        network.fail_orders("subgraph down");
        let reader = OrderHistoryReader::new(Some(network), Duration::from_secs(1));

        let result = reader.fetch(Some(account())).await;

        assert!(matches!(result, Err(Error::History(HistoryError::Query(_)))));
    }
}
