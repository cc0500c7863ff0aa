//! Order submission against a recording execution network.

use std::sync::Arc;
use std::time::Duration;

use limit_desk::app::{NetworkConfig, OrderSubmitter, Session, SubmitOutcome};
use limit_desk::domain::{LimitOrderParams, NATIVE_TOKEN};
use limit_desk::error::{Error, SubmissionError};
use limit_desk::testkit::domain::{account, units, DAI, PSP};
use limit_desk::testkit::network::{NetworkCall, RecordingNetwork};
use rust_decimal_macros::dec;

fn submitter(network: &Arc<RecordingNetwork>) -> Arc<OrderSubmitter> {
    Arc::new(OrderSubmitter::new(
        Some(network.clone()),
        NetworkConfig::default(),
        Duration::from_secs(5),
    ))
}

fn params() -> LimitOrderParams {
    LimitOrderParams {
        source_token: DAI,
        destination_token: PSP,
        amount: dec!(2),
        min_return: dec!(1),
    }
}

#[tokio::test]
async fn submitted_order_links_to_explorer() {
    let network = Arc::new(RecordingNetwork::new());
    let submitter = submitter(&network);

    let outcome = submitter
        .submit_params(&Session::connected(account()), &params())
        .await
        .unwrap();

    let SubmitOutcome::Submitted(order) = outcome else {
        panic!("expected submission, got {outcome:?}");
    };
    assert_eq!(order.input_amount, units(2));
    assert_eq!(order.min_return, units(1));
    assert_eq!(
        order.explorer_url.as_str(),
        format!("https://polygonscan.com/tx/{:?}", order.tx_hash)
    );
}

#[tokio::test]
async fn erc20_order_is_approved_exactly_once() {
    let network = Arc::new(RecordingNetwork::new());
    let submitter = submitter(&network);

    submitter
        .submit_params(&Session::connected(account()), &params())
        .await
        .unwrap();

    assert_eq!(network.approvals(), 1);
    assert_eq!(
        network.calls()[0],
        NetworkCall::Approve {
            token: DAI,
            amount: units(2),
        }
    );
}

#[tokio::test]
async fn native_order_is_not_approved() {
    let network = Arc::new(RecordingNetwork::new());
    let submitter = submitter(&network);
    let params = LimitOrderParams {
        source_token: NATIVE_TOKEN,
        ..params()
    };

    submitter
        .submit_params(&Session::connected(account()), &params)
        .await
        .unwrap();

    assert_eq!(
        network.calls(),
        vec![NetworkCall::Submit {
            source: NATIVE_TOKEN,
            destination: PSP,
            amount: units(2),
            min_return: units(1),
        }]
    );
}

#[tokio::test]
async fn second_submission_while_in_flight_is_refused() {
    let network = Arc::new(RecordingNetwork::new());
    let gate = network.gate_submission();
    let submitter = submitter(&network);
    let session = Session::connected(account());

    let first = {
        let submitter = Arc::clone(&submitter);
        tokio::spawn(async move { submitter.submit_params(&session, &params()).await })
    };
    tokio::time::timeout(Duration::from_secs(1), async {
        while network.submissions() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("first submission reached the network");

    assert!(submitter.is_in_flight());
    assert!(!submitter.can_submit(&session));
    let second = submitter.submit_params(&session, &params()).await;
    assert!(matches!(
        second,
        Err(Error::Submission(SubmissionError::InFlight))
    ));

    gate.send(()).unwrap();
    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, SubmitOutcome::Submitted(_)));
    assert!(!submitter.is_in_flight());

    let third = submitter.submit_params(&session, &params()).await.unwrap();
    assert!(matches!(third, SubmitOutcome::Submitted(_)));
    assert_eq!(network.submissions(), 2);
}

#[tokio::test]
async fn network_failure_is_returned_to_caller() {
    let network = Arc::new(RecordingNetwork::new());
    network.fail_submission("execution reverted");
    let submitter = submitter(&network);

    let result = submitter
        .submit_params(&Session::connected(account()), &params())
        .await;

    match result {
        Err(Error::Submission(SubmissionError::SubmissionFailed(message))) => {
            assert_eq!(message, "execution reverted");
        }
        other => panic!("expected submission failure, got {other:?}"),
    }
    assert!(!submitter.is_in_flight());
}

#[tokio::test]
async fn min_return_is_truncated_to_base_units() {
    let network = Arc::new(RecordingNetwork::new());
    let submitter = submitter(&network);
    let params = LimitOrderParams {
        min_return: dec!(0.0000000000000000019),
        ..params()
    };

    let outcome = submitter
        .submit_params(&Session::connected(account()), &params)
        .await
        .unwrap();

    let SubmitOutcome::Submitted(order) = outcome else {
        panic!("expected submission");
    };
    assert_eq!(order.min_return, alloy_primitives::U256::from(1u8));
}
