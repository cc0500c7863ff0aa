//! Order submission: approve the sell token once, then place the order.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use url::Url;

use super::config::NetworkConfig;
use super::session::Session;
use crate::domain::LimitOrderParams;
use crate::error::{Error, Result, SubmissionError};
use crate::port::ExecutionNetwork;

/// Why a submission was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotReadyReason {
    NoAccount,
    NoExecutionNetwork,
    NoAmount,
    NoMinReturn,
}

impl std::fmt::Display for NotReadyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NoAccount => "no wallet account connected",
            Self::NoExecutionNetwork => "execution network unavailable",
            Self::NoAmount => "no amount entered",
            Self::NoMinReturn => "no minimum return available",
        };
        f.write_str(text)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedOrder {
    pub tx_hash: TxHash,
    pub explorer_url: Url,
    pub input_amount: U256,
    pub min_return: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmittedOrder),
    /// Nothing was sent.
    NotReady(NotReadyReason),
}

/// Places limit orders on the execution network.
///
/// At most one submission runs at a time; a second attempt while one is in
/// flight fails with [`SubmissionError::InFlight`].
pub struct OrderSubmitter {
    network: Option<Arc<dyn ExecutionNetwork>>,
    chain: NetworkConfig,
    timeout: Duration,
    in_flight: Mutex<()>,
}

impl OrderSubmitter {
    pub fn new(
        network: Option<Arc<dyn ExecutionNetwork>>,
        chain: NetworkConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            network,
            chain,
            timeout,
            in_flight: Mutex::new(()),
        }
    }

    /// True while a submission is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Whether a submission could start now, given complete order inputs.
    pub fn can_submit(&self, session: &Session) -> bool {
        session.is_connected() && self.network.is_some() && !self.is_in_flight()
    }

    /// Submit a complete order.
    pub async fn submit_params(
        &self,
        session: &Session,
        params: &LimitOrderParams,
    ) -> Result<SubmitOutcome> {
        self.submit(
            session,
            params.source_token,
            params.destination_token,
            Some(params.amount),
            Some(params.min_return),
        )
        .await
    }

    /// Submit an order, or report why it cannot be submitted yet.
    ///
    /// Selling the native currency skips the approval. Any other token is
    /// approved for exactly the input amount before the order is placed;
    /// if the approval fails the order is not placed.
    pub async fn submit(
        &self,
        session: &Session,
        source: Address,
        destination: Address,
        amount: Option<Decimal>,
        min_return: Option<Decimal>,
    ) -> Result<SubmitOutcome> {
        if !session.is_connected() {
            return Ok(SubmitOutcome::NotReady(NotReadyReason::NoAccount));
        }
        let Some(network) = self.network.as_ref() else {
            return Ok(SubmitOutcome::NotReady(NotReadyReason::NoExecutionNetwork));
        };
        let Some(amount) = amount else {
            return Ok(SubmitOutcome::NotReady(NotReadyReason::NoAmount));
        };
        let Some(min_return) = min_return else {
            return Ok(SubmitOutcome::NotReady(NotReadyReason::NoMinReturn));
        };

        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SubmissionError::InFlight)?;

        let params = LimitOrderParams {
            source_token: source,
            destination_token: destination,
            amount,
            min_return,
        };
        let input_amount = params
            .input_amount()
            .map_err(|e| SubmissionError::InvalidAmount {
                field: "amount",
                reason: e.to_string(),
            })?;
        let output_min_return =
            params
                .output_min_return()
                .map_err(|e| SubmissionError::InvalidAmount {
                    field: "min_return",
                    reason: e.to_string(),
                })?;

        // A placed order must always get its link back.
        let explorer = self.chain.explorer_tx_base()?;

        info!(
            network = network.network_name(),
            source = %source,
            destination = %destination,
            input_amount = %input_amount,
            min_return = %output_min_return,
            "Submitting limit order"
        );

        if source == self.chain.native_token {
            info!("Selling native currency, skipping approval");
        } else {
            let approval = network.approve_token_amount(source, input_amount);
            match tokio::time::timeout(self.timeout, approval).await {
                Ok(Ok(())) => info!(token = %source, amount = %input_amount, "Token approved"),
                Ok(Err(err)) => {
                    error!(error = %err, "Token approval failed");
                    return Err(approval_error(err).into());
                }
                Err(_) => {
                    warn!(timeout_ms = self.timeout_ms(), "Token approval timed out");
                    return Err(SubmissionError::Timeout {
                        step: "approval",
                        timeout_ms: self.timeout_ms(),
                    }
                    .into());
                }
            }
        }

        let placement =
            network.submit_limit_order(source, destination, input_amount, output_min_return);
        let tx_hash = match tokio::time::timeout(self.timeout, placement).await {
            Ok(Ok(hash)) => hash,
            Ok(Err(err)) => {
                error!(error = %err, "Order submission failed");
                return Err(submission_error(err).into());
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout_ms(), "Order submission timed out");
                return Err(SubmissionError::Timeout {
                    step: "submission",
                    timeout_ms: self.timeout_ms(),
                }
                .into());
            }
        };

        let explorer_url = explorer.join(&format!("{tx_hash:?}")).unwrap_or_else(|e| {
            warn!(error = %e, "Could not build explorer link");
            explorer.clone()
        });
        info!(tx_hash = %tx_hash, url = %explorer_url, "Limit order submitted");

        Ok(SubmitOutcome::Submitted(SubmittedOrder {
            tx_hash,
            explorer_url,
            input_amount,
            min_return: output_min_return,
        }))
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

fn approval_error(err: Error) -> SubmissionError {
    match err {
        Error::Submission(inner) => inner,
        other => SubmissionError::ApprovalFailed(other.to_string()),
    }
}

fn submission_error(err: Error) -> SubmissionError {
    match err {
        Error::Submission(inner) => inner,
        other => SubmissionError::SubmissionFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NATIVE_TOKEN;
    use crate::testkit::domain::{account, units, DAI, PSP};
    use crate::testkit::network::{NetworkCall, RecordingNetwork};
    use rust_decimal_macros::dec;

    fn submitter(network: &Arc<RecordingNetwork>) -> OrderSubmitter {
        OrderSubmitter::new(
            Some(network.clone()),
            NetworkConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn approves_then_submits_erc20_order() {
        let network = Arc::new(RecordingNetwork::new());
        let submitter = submitter(&network);
        let session = Session::connected(account());

        let outcome = submitter
            .submit(&session, DAI, PSP, Some(dec!(2)), Some(dec!(1)))
            .await
            .unwrap();

        assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
        assert_eq!(
            network.calls(),
            vec![
                NetworkCall::Approve {
                    token: DAI,
                    amount: units(2)
                },
                NetworkCall::Submit {
                    source: DAI,
                    destination: PSP,
                    amount: units(2),
                    min_return: units(1),
                },
            ]
        );
    }

    #[tokio::test]
    async fn native_sell_skips_approval() {
        let network = Arc::new(RecordingNetwork::new());
        let submitter = submitter(&network);
        let session = Session::connected(account());

        submitter
            .submit(&session, NATIVE_TOKEN, PSP, Some(dec!(1)), Some(dec!(3)))
            .await
            .unwrap();

        assert_eq!(network.approvals(), 0);
        assert_eq!(network.submissions(), 1);
    }

    #[tokio::test]
    async fn missing_inputs_are_not_ready() {
        let network = Arc::new(RecordingNetwork::new());
        let submitter = submitter(&network);
        let session = Session::connected(account());

        let no_amount = submitter
            .submit(&session, DAI, PSP, None, Some(dec!(1)))
            .await
            .unwrap();
        let no_return = submitter
            .submit(&session, DAI, PSP, Some(dec!(1)), None)
            .await
            .unwrap();
        let no_account = submitter
            .submit(&Session::disconnected(), DAI, PSP, Some(dec!(1)), Some(dec!(1)))
            .await
            .unwrap();

        assert_eq!(no_amount, SubmitOutcome::NotReady(NotReadyReason::NoAmount));
        assert_eq!(no_return, SubmitOutcome::NotReady(NotReadyReason::NoMinReturn));
        assert_eq!(no_account, SubmitOutcome::NotReady(NotReadyReason::NoAccount));
        assert!(network.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_network_is_not_ready() {
        let submitter =
            OrderSubmitter::new(None, NetworkConfig::default(), Duration::from_secs(1));
        let outcome = submitter
            .submit(
                &Session::connected(account()),
                DAI,
                PSP,
                Some(dec!(1)),
                Some(dec!(1)),
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::NotReady(NotReadyReason::NoExecutionNetwork)
        );
    }

    #[tokio::test]
    async fn failed_approval_stops_submission() {
        let network = Arc::new(RecordingNetwork::new());
        network.fail_approval("user rejected");
        let submitter = submitter(&network);

        let result = submitter
            .submit(
                &Session::connected(account()),
                DAI,
                PSP,
                Some(dec!(1)),
                Some(dec!(1)),
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Submission(SubmissionError::ApprovalFailed(_)))
        ));
        assert_eq!(network.submissions(), 0);
    }

    #[tokio::test]
    async fn unusable_explorer_url_fails_before_any_call() {
        let network = Arc::new(RecordingNetwork::new());
        let chain = NetworkConfig {
            explorer_url: "mailto:ops@example.com".into(),
            ..NetworkConfig::default()
        };
        let submitter =
            OrderSubmitter::new(Some(network.clone()), chain, Duration::from_secs(5));

        let result = submitter
            .submit(
                &Session::connected(account()),
                DAI,
                PSP,
                Some(dec!(1)),
                Some(dec!(1)),
            )
            .await;

        assert!(result.is_err());
        assert!(network.calls().is_empty());
    }

    #[tokio::test]
    async fn over_precise_amount_is_rejected_before_any_call() {
        let network = Arc::new(RecordingNetwork::new());
        let submitter = submitter(&network);

        let result = submitter
            .submit(
                &Session::connected(account()),
                DAI,
                PSP,
                Some(dec!(0.0000000000000000001)),
                Some(dec!(1)),
            )
            .await;

        assert!(matches!(
            result,
            Err(Error::Submission(SubmissionError::InvalidAmount {
                field: "amount",
                ..
            }))
        ));
        assert!(network.calls().is_empty());
    }
}
