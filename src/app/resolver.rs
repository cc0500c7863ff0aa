//! Market-rate resolution with last-issued-wins semantics.
//!
//! Every lookup takes a generation number when it is issued. A completion
//! may publish its outcome only while its generation is still the latest;
//! anything older is discarded, whatever order the network answers in.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rust_decimal::RoundingStrategy;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::amount::{parse_decimal, to_base_units_rounded, TOKEN_DECIMALS};
use crate::domain::{market_rate, QuoteRequest, RateOutcome};
use crate::error::QuoteError;
use crate::port::{QuoteResponse, QuoteSource};

/// What happened to a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome was published.
    Applied(RateOutcome),
    /// A newer lookup was issued first; this outcome was dropped.
    Superseded,
}

struct Inner {
    source: Arc<dyn QuoteSource>,
    timeout: Duration,
    generation: Mutex<u64>,
    outcome: watch::Sender<RateOutcome>,
}

impl Inner {
    /// Publish `outcome` if `generation` is still current.
    fn publish(&self, generation: u64, outcome: RateOutcome) -> Resolution {
        let current = self.generation.lock();
        if *current != generation {
            debug!(
                generation,
                current = *current,
                "Discarding superseded quote"
            );
            return Resolution::Superseded;
        }
        self.outcome.send_replace(outcome.clone());
        Resolution::Applied(outcome)
    }
}

/// Resolves market rates and exposes the latest one.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct RateResolver {
    inner: Arc<Inner>,
}

impl RateResolver {
    pub fn new(source: Arc<dyn QuoteSource>, timeout: Duration) -> Self {
        let (outcome, _) = watch::channel(RateOutcome::Idle);
        Self {
            inner: Arc::new(Inner {
                source,
                timeout,
                generation: Mutex::new(0),
                outcome,
            }),
        }
    }

    /// Latest published outcome.
    pub fn outcome(&self) -> RateOutcome {
        self.inner.outcome.borrow().clone()
    }

    /// Watch every published outcome.
    pub fn subscribe(&self) -> watch::Receiver<RateOutcome> {
        self.inner.outcome.subscribe()
    }

    /// Number of lookups issued so far.
    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    /// Issue a lookup for `request`.
    ///
    /// The lookup is registered before this returns, superseding every
    /// earlier one; the returned future performs the network call. A blank
    /// amount clears the outcome to [`RateOutcome::Idle`] without a call.
    pub fn resolve(
        &self,
        request: QuoteRequest,
    ) -> impl Future<Output = Resolution> + Send + 'static {
        let inner = Arc::clone(&self.inner);

        let (generation, src_amount) = {
            let mut current = inner.generation.lock();
            *current += 1;
            let generation = *current;

            let (initial, src_amount) = match scaled_amount(&request) {
                Ok(Some(units)) => (RateOutcome::Pending, Some(units)),
                Ok(None) => (RateOutcome::Idle, None),
                Err(message) => (RateOutcome::Error(message), None),
            };
            inner.outcome.send_replace(initial);
            (generation, src_amount)
        };

        async move {
            let Some(src_amount) = src_amount else {
                return Resolution::Applied(inner.outcome.borrow().clone());
            };

            debug!(
                generation,
                source = %request.source,
                destination = %request.destination,
                amount = %request.amount,
                quote_source = inner.source.source_name(),
                "Requesting quote"
            );

            let outcome = match fetch(&inner, &request, src_amount).await {
                Ok(rate) => RateOutcome::Rate(rate),
                Err(err) => {
                    warn!(generation, error = %err, "Quote failed");
                    RateOutcome::Error(err.to_string())
                }
            };
            inner.publish(generation, outcome)
        }
    }
}

/// Amount in base units; `None` when blank, error text when unusable.
fn scaled_amount(request: &QuoteRequest) -> Result<Option<alloy_primitives::U256>, String> {
    if request.is_blank() {
        return Ok(None);
    }
    let amount = parse_decimal(&request.amount).map_err(|e| e.to_string())?;
    to_base_units_rounded(amount, TOKEN_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
        .map(Some)
        .map_err(|e| e.to_string())
}

async fn fetch(
    inner: &Inner,
    request: &QuoteRequest,
    src_amount: alloy_primitives::U256,
) -> Result<rust_decimal::Decimal, QuoteError> {
    let call = inner
        .source
        .get_rate(request.source, request.destination, src_amount);
    let response = tokio::time::timeout(inner.timeout, call)
        .await
        .map_err(|_| QuoteError::Timeout {
            timeout_ms: u64::try_from(inner.timeout.as_millis()).unwrap_or(u64::MAX),
        })?
        .map_err(|e| match e {
            crate::error::Error::Quote(quote) => quote,
            other => QuoteError::Transport(other.to_string()),
        })?;

    match response {
        QuoteResponse::Route {
            src_amount,
            dest_amount,
        } => market_rate(src_amount, dest_amount)
            .map_err(|e| QuoteError::InvalidResponse(e.to_string())),
        QuoteResponse::Rejected { message } => Err(QuoteError::Rejected(message)),
    }
}
