//! Rate resolution under concurrent, out-of-order quote completions.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use limit_desk::app::{RateResolver, Resolution};
use limit_desk::domain::{QuoteRequest, RateOutcome};
use limit_desk::error::QuoteError;
use limit_desk::testkit::domain::{units, DAI, PSP};
use limit_desk::testkit::quote::ScriptedQuoteSource;
use rust_decimal_macros::dec;

fn resolver(source: &Arc<ScriptedQuoteSource>) -> RateResolver {
    RateResolver::new(source.clone(), Duration::from_secs(5))
}

async fn wait_for_calls(source: &ScriptedQuoteSource, count: usize) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while source.calls().len() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("quote source called");
}

#[tokio::test]
async fn older_quote_finishing_last_is_discarded() {
    let source = Arc::new(ScriptedQuoteSource::new());
    let gate_one = source.gated_route(units(1), units(1), units(3));
    let gate_two = source.gated_route(units(2), units(2), units(1));
    let resolver = resolver(&source);

    let first = tokio::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "1")));
    let second = tokio::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "2")));
    wait_for_calls(&source, 2).await;

    gate_two.send(()).unwrap();
    assert_eq!(
        second.await.unwrap(),
        Resolution::Applied(RateOutcome::Rate(dec!(0.5)))
    );

    gate_one.send(()).unwrap();
    assert_eq!(first.await.unwrap(), Resolution::Superseded);

    assert_eq!(resolver.outcome(), RateOutcome::Rate(dec!(0.5)));
}

#[tokio::test]
async fn older_quote_finishing_first_is_discarded() {
    let source = Arc::new(ScriptedQuoteSource::new());
    let gate_one = source.gated_route(units(1), units(1), units(3));
    let gate_two = source.gated_route(units(2), units(2), units(1));
    let resolver = resolver(&source);

    let first = tokio::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "1")));
    let second = tokio::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "2")));
    wait_for_calls(&source, 2).await;

    gate_one.send(()).unwrap();
    assert_eq!(first.await.unwrap(), Resolution::Superseded);
    assert!(resolver.outcome().is_pending());

    gate_two.send(()).unwrap();
    second.await.unwrap();
    assert_eq!(resolver.outcome().rate(), Some(dec!(0.5)));
}

#[tokio::test]
async fn blank_amount_supersedes_in_flight_quote() {
    let source = Arc::new(ScriptedQuoteSource::new());
    let gate = source.gated_route(units(1), units(1), units(3));
    let resolver = resolver(&source);

    let pending = tokio::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "1")));
    wait_for_calls(&source, 1).await;
    resolver.resolve(QuoteRequest::new(DAI, PSP, "  ")).await;

    gate.send(()).unwrap();
    assert_eq!(pending.await.unwrap(), Resolution::Superseded);
    assert_eq!(resolver.outcome(), RateOutcome::Idle);
}

#[tokio::test]
async fn transport_failure_is_reported_as_outcome() {
    let source = Arc::new(ScriptedQuoteSource::new());
    source.fail(units(1), QuoteError::Transport("connection refused".into()));
    let resolver = resolver(&source);

    resolver.resolve(QuoteRequest::new(DAI, PSP, "1")).await;

    assert_eq!(
        resolver.outcome().error(),
        Some("quote service unreachable: connection refused")
    );
}

#[tokio::test]
async fn subscribers_see_pending_then_rate() {
    let source = Arc::new(ScriptedQuoteSource::new());
    let gate = source.gated_route(units(4), units(4), units(2));
    let resolver = resolver(&source);
    let mut updates = resolver.subscribe();

    let pending = tokio::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "4")));
    updates.changed().await.unwrap();
    assert!(updates.borrow_and_update().is_pending());

    gate.send(()).unwrap();
    pending.await.unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow().rate(), Some(dec!(0.5)));
}

#[tokio::test]
async fn fractional_amount_is_scaled_to_base_units() {
    let source = Arc::new(ScriptedQuoteSource::new());
    let half = units(1) / U256::from(2u8);
    source.route(half, half, units(1));
    let resolver = resolver(&source);

    resolver.resolve(QuoteRequest::new(DAI, PSP, "0.5")).await;

    assert_eq!(source.calls(), vec![half]);
    assert_eq!(resolver.outcome().rate(), Some(dec!(2)));
}

#[tokio::test]
async fn lookup_waits_on_quote_source() {
    let source = Arc::new(ScriptedQuoteSource::new());
    let gate = source.gated_route(units(1), units(1), units(4));
    let resolver = resolver(&source);

    let mut lookup = tokio_test::task::spawn(resolver.resolve(QuoteRequest::new(DAI, PSP, "1")));
    tokio_test::assert_pending!(lookup.poll());
    assert!(resolver.outcome().is_pending());

    gate.send(()).unwrap();
    assert!(lookup.is_woken());
    let resolution = tokio_test::assert_ready!(lookup.poll());

    assert_eq!(resolution, Resolution::Applied(RateOutcome::Rate(dec!(4))));
}
