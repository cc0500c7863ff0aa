//! Assembles services from configuration.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use tokio::sync::watch;
use tracing::warn;

use super::config::Config;
use super::desk::OrderDesk;
use super::history::OrderHistoryReader;
use super::resolver::RateResolver;
use super::session::Session;
use super::submitter::OrderSubmitter;
use crate::adapter::outbound::paraswap::ParaSwapClient;
use crate::domain::OrderDraft;
use crate::port::{ExecutionNetwork, QuoteSource};

/// Everything the commands need, built once per invocation.
pub struct Services {
    pub config: Config,
    pub quote_source: Arc<dyn QuoteSource>,
    pub network: Option<Arc<dyn ExecutionNetwork>>,
    sessions: watch::Sender<Session>,
}

impl Services {
    /// Build from configuration. A missing or unusable wallet leaves the
    /// session disconnected; it is not an error.
    pub fn from_config(config: Config) -> Self {
        let quote_source: Arc<dyn QuoteSource> =
            Arc::new(ParaSwapClient::from_config(&config.quote, config.network.chain_id));
        let (network, account) = init_network(&config);
        let (sessions, _) = watch::channel(Session::from(account));

        Self {
            config,
            quote_source,
            network,
            sessions,
        }
    }

    /// Build with injected ports and session.
    pub fn with_ports(
        config: Config,
        quote_source: Arc<dyn QuoteSource>,
        network: Option<Arc<dyn ExecutionNetwork>>,
        session: Session,
    ) -> Self {
        let (sessions, _) = watch::channel(session);
        Self {
            config,
            quote_source,
            network,
            sessions,
        }
    }

    pub fn session(&self) -> Session {
        *self.sessions.borrow()
    }

    pub fn sessions(&self) -> watch::Receiver<Session> {
        self.sessions.subscribe()
    }

    /// Replace the current session, e.g. after a wallet switch.
    pub fn set_session(&self, session: Session) {
        self.sessions.send_replace(session);
    }

    pub fn resolver(&self) -> RateResolver {
        RateResolver::new(
            Arc::clone(&self.quote_source),
            Duration::from_millis(self.config.quote.timeout_ms),
        )
    }

    pub fn submitter(&self) -> OrderSubmitter {
        OrderSubmitter::new(
            self.network.clone(),
            self.config.network.clone(),
            Duration::from_millis(self.config.execution.timeout_ms),
        )
    }

    pub fn history(&self) -> OrderHistoryReader {
        OrderHistoryReader::new(
            self.network.clone(),
            Duration::from_millis(self.config.execution.timeout_ms),
        )
    }

    /// A desk starting from `draft`.
    pub fn desk(&self, draft: OrderDraft) -> OrderDesk {
        OrderDesk::new(draft, self.resolver(), self.submitter(), self.sessions())
    }

    /// A desk starting from the configured defaults.
    pub fn default_desk(&self) -> OrderDesk {
        let defaults = &self.config.defaults;
        self.desk(OrderDraft::new(
            defaults.source_token,
            defaults.destination_token,
            defaults.amount.clone(),
        ))
    }
}

#[cfg(feature = "gelato")]
fn init_network(config: &Config) -> (Option<Arc<dyn ExecutionNetwork>>, Option<Address>) {
    use crate::adapter::outbound::gelato::GelatoNetwork;

    match GelatoNetwork::from_config(config) {
        Ok(network) => {
            let account = network.account();
            match account {
                Some(address) => tracing::info!(account = %address, "Wallet connected"),
                None => tracing::info!("No wallet configured - read-only mode"),
            }
            (Some(Arc::new(network)), account)
        }
        Err(e) => {
            warn!(error = %e, "Failed to initialize execution network");
            (None, None)
        }
    }
}

#[cfg(not(feature = "gelato"))]
fn init_network(_config: &Config) -> (Option<Arc<dyn ExecutionNetwork>>, Option<Address>) {
    warn!("Built without an execution network - quotes only");
    (None, None)
}
