//! The order desk: one draft, its market rate, and submission.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::debug;

use alloy_primitives::Address;

use super::resolver::{RateResolver, Resolution};
use super::session::Session;
use super::submitter::{OrderSubmitter, SubmitOutcome};
use crate::domain::amount::parse_decimal;
use crate::domain::{OrderDraft, RateOutcome};
use crate::error::Result;

/// Ties an [`OrderDraft`] to live market rates and the submitter.
///
/// Every input that affects the quote re-issues a lookup. The lookup is
/// issued while the draft is still locked, so lookups are ordered exactly
/// like the edits that caused them.
pub struct OrderDesk {
    draft: RwLock<OrderDraft>,
    resolver: RateResolver,
    submitter: OrderSubmitter,
    sessions: watch::Receiver<Session>,
}

impl OrderDesk {
    pub fn new(
        draft: OrderDraft,
        resolver: RateResolver,
        submitter: OrderSubmitter,
        sessions: watch::Receiver<Session>,
    ) -> Self {
        Self {
            draft: RwLock::new(draft),
            resolver,
            submitter,
            sessions,
        }
    }

    /// Current draft with the latest published market outcome.
    pub fn draft(&self) -> OrderDraft {
        let mut draft = self.draft.read().clone();
        draft.apply_market(self.resolver.outcome());
        draft
    }

    pub fn market(&self) -> RateOutcome {
        self.resolver.outcome()
    }

    pub fn min_return(&self) -> Option<Decimal> {
        self.draft().min_return()
    }

    pub fn session(&self) -> Session {
        *self.sessions.borrow()
    }

    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    /// Whether the submit action should be offered.
    pub fn can_submit(&self) -> bool {
        self.submitter.can_submit(&self.session()) && self.draft().order_params().is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitter.is_in_flight()
    }

    /// Re-quote the draft as it stands.
    pub async fn refresh(&self) -> RateOutcome {
        self.edit(|_| true).await
    }

    pub async fn set_amount(&self, amount: impl Into<String>) -> RateOutcome {
        let amount = amount.into();
        self.edit(move |draft| draft.set_amount(amount)).await
    }

    pub async fn set_source_token(&self, token: Address) -> RateOutcome {
        self.edit(move |draft| draft.set_source_token(token)).await
    }

    /// Also restores the default amount.
    pub async fn set_destination_token(&self, token: Address) -> RateOutcome {
        self.edit(move |draft| draft.set_destination_token(token)).await
    }

    /// The desired rate never triggers a lookup.
    pub fn set_desired_rate(&self, rate: Option<String>) {
        self.draft.write().set_desired_rate(rate);
    }

    /// Submit the draft with the current session.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let draft = self.draft();
        let amount = parse_decimal(draft.amount()).ok();
        self.submitter
            .submit(
                &self.session(),
                draft.source_token(),
                draft.destination_token(),
                amount,
                draft.min_return(),
            )
            .await
    }

    /// Apply `change`; re-quote when it reports a change.
    async fn edit<F>(&self, change: F) -> RateOutcome
    where
        F: FnOnce(&mut OrderDraft) -> bool,
    {
        let pending = {
            let mut draft = self.draft.write();
            if !change(&mut draft) {
                return self.resolver.outcome();
            }
            self.resolver.resolve(draft.quote_request())
        };

        match pending.await {
            Resolution::Applied(outcome) => outcome,
            Resolution::Superseded => {
                debug!("Quote superseded by a newer edit");
                self.resolver.outcome()
            }
        }
    }
}
