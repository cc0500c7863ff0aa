//! Recording [`ExecutionNetwork`] for submission and history tests.

use std::sync::Mutex;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::domain::HistoricalOrder;
use crate::error::{HistoryError, Result, SubmissionError};
use crate::port::ExecutionNetwork;

/// One call made against the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCall {
    Approve {
        token: Address,
        amount: U256,
    },
    Submit {
        source: Address,
        destination: Address,
        amount: U256,
        min_return: U256,
    },
    GetOrders {
        account: Address,
    },
}

/// Records every call and answers from configured state.
///
/// Submissions return sequential transaction hashes starting at 1.
#[derive(Default)]
pub struct RecordingNetwork {
    calls: Mutex<Vec<NetworkCall>>,
    approval_error: Mutex<Option<String>>,
    submission_error: Mutex<Option<String>>,
    orders_error: Mutex<Option<String>>,
    orders: Mutex<Vec<HistoricalOrder>>,
    submission_gate: Mutex<Option<oneshot::Receiver<()>>>,
    orders_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl RecordingNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_approval(&self, message: &str) {
        *self.approval_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_submission(&self, message: &str) {
        *self.submission_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_orders(&self, message: &str) {
        *self.orders_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_orders(&self, orders: Vec<HistoricalOrder>) {
        *self.orders.lock().unwrap() = orders;
    }

    /// Hold the next submission until the returned gate fires.
    pub fn gate_submission(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.submission_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Hold the next order query until the returned gate fires. The
    /// answer is taken when the query starts.
    pub fn gate_orders(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.orders_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<NetworkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn approvals(&self) -> usize {
        self.count(|call| matches!(call, NetworkCall::Approve { .. }))
    }

    pub fn submissions(&self) -> usize {
        self.count(|call| matches!(call, NetworkCall::Submit { .. }))
    }

    fn count(&self, predicate: impl Fn(&NetworkCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: NetworkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ExecutionNetwork for RecordingNetwork {
    async fn approve_token_amount(&self, token: Address, amount: U256) -> Result<()> {
        self.record(NetworkCall::Approve { token, amount });
        match self.approval_error.lock().unwrap().clone() {
            Some(message) => Err(SubmissionError::ApprovalFailed(message).into()),
            None => Ok(()),
        }
    }

    async fn submit_limit_order(
        &self,
        src: Address,
        dest: Address,
        amount: U256,
        min_return: U256,
    ) -> Result<TxHash> {
        self.record(NetworkCall::Submit {
            source: src,
            destination: dest,
            amount,
            min_return,
        });
        let gate = self.submission_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(message) = self.submission_error.lock().unwrap().clone() {
            return Err(SubmissionError::SubmissionFailed(message).into());
        }
        Ok(TxHash::from(U256::from(self.submissions())))
    }

    async fn get_orders(&self, account: Address) -> Result<Vec<HistoricalOrder>> {
        self.record(NetworkCall::GetOrders { account });
        let answer = match self.orders_error.lock().unwrap().clone() {
            Some(message) => Err(HistoryError::Query(message).into()),
            None => Ok(self.orders.lock().unwrap().clone()),
        };
        let gate = self.orders_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        answer
    }

    fn network_name(&self) -> &'static str {
        "recording"
    }
}
