//! Scripted [`QuoteSource`] for resolver tests.
//!
//! Replies are keyed by the requested source amount and consumed once.
//! A gated reply is held until its gate fires, so tests decide the order
//! in which concurrent lookups complete.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{QuoteError, Result};
use crate::port::{QuoteResponse, QuoteSource};

struct Scripted {
    reply: std::result::Result<QuoteResponse, QuoteError>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct ScriptedQuoteSource {
    replies: Mutex<HashMap<U256, Scripted>>,
    calls: Mutex<Vec<U256>>,
}

impl ScriptedQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, amount: U256, reply: std::result::Result<QuoteResponse, QuoteError>) {
        self.insert(amount, reply, false);
    }

    fn insert(
        &self,
        amount: U256,
        reply: std::result::Result<QuoteResponse, QuoteError>,
        gated: bool,
    ) -> Option<oneshot::Sender<()>> {
        let (tx, rx) = if gated {
            let (tx, rx) = oneshot::channel();
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };
        self.replies
            .lock()
            .unwrap()
            .insert(amount, Scripted { reply, gate: rx });
        tx
    }

    /// Answer a lookup for `amount` with a route.
    pub fn route(&self, amount: U256, src_amount: U256, dest_amount: U256) {
        self.script(
            amount,
            Ok(QuoteResponse::Route {
                src_amount,
                dest_amount,
            }),
        );
    }

    /// Like [`route`](Self::route), held until the returned gate fires.
    pub fn gated_route(
        &self,
        amount: U256,
        src_amount: U256,
        dest_amount: U256,
    ) -> oneshot::Sender<()> {
        self.insert(
            amount,
            Ok(QuoteResponse::Route {
                src_amount,
                dest_amount,
            }),
            true,
        )
        .expect("gated reply has a gate")
    }

    /// Answer with a service rejection.
    pub fn reject(&self, amount: U256, message: &str) {
        self.script(
            amount,
            Ok(QuoteResponse::Rejected {
                message: message.to_string(),
            }),
        );
    }

    /// Fail the call itself.
    pub fn fail(&self, amount: U256, error: QuoteError) {
        self.script(amount, Err(error));
    }

    /// Source amounts requested so far, in call order.
    pub fn calls(&self) -> Vec<U256> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuoteSource {
    async fn get_rate(&self, _src: Address, _dest: Address, src_amount: U256) -> Result<QuoteResponse> {
        self.calls.lock().unwrap().push(src_amount);
        let scripted = self.replies.lock().unwrap().remove(&src_amount);
        let Some(scripted) = scripted else {
            return Err(QuoteError::Transport(format!("no reply scripted for {src_amount}")).into());
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        Ok(scripted.reply?)
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
