//! Order history following the wallet session.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{address, Address};
use chrono::Utc;
use limit_desk::app::{OrderHistoryReader, Session};
use limit_desk::domain::TokenList;
use limit_desk::testkit::domain::{account, historical_order};
use limit_desk::testkit::network::{NetworkCall, RecordingNetwork};
use tokio::sync::watch;

const WAIT: Duration = Duration::from_secs(1);

async fn wait_for_query(network: &RecordingNetwork, account: Address) {
    tokio::time::timeout(WAIT, async {
        while !network
            .calls()
            .contains(&NetworkCall::GetOrders { account })
        {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("orders queried");
}

fn reader(network: &Arc<RecordingNetwork>) -> Arc<OrderHistoryReader> {
    Arc::new(OrderHistoryReader::new(
        Some(network.clone()),
        Duration::from_secs(1),
    ))
}

#[tokio::test]
async fn connecting_loads_orders() {
    let network = Arc::new(RecordingNetwork::new());
    network.set_orders(vec![historical_order("0x02"), historical_order("0x01")]);
    let (sessions, rx) = watch::channel(Session::disconnected());
    let (mut orders, handle) = reader(&network).follow(rx);

    sessions.send_replace(Session::connected(account()));

    let loaded = tokio::time::timeout(WAIT, orders.wait_for(|o| !o.is_empty()))
        .await
        .expect("orders published")
        .expect("follower running")
        .clone();
    let ids: Vec<_> = loaded.iter().map(|o| o.id.clone()).collect();
    assert_eq!(ids, vec!["0x02", "0x01"]);
    assert_eq!(
        network.calls(),
        vec![NetworkCall::GetOrders { account: account() }]
    );

    drop(sessions);
    tokio::time::timeout(WAIT, handle)
        .await
        .expect("follower stops")
        .unwrap();
}

#[tokio::test]
async fn disconnecting_clears_orders() {
    let network = Arc::new(RecordingNetwork::new());
    network.set_orders(vec![historical_order("0x01")]);
    let (sessions, rx) = watch::channel(Session::connected(account()));
    let (mut orders, _handle) = reader(&network).follow(rx);
    tokio::time::timeout(WAIT, orders.wait_for(|o| !o.is_empty()))
        .await
        .unwrap()
        .unwrap();

    sessions.send_replace(Session::disconnected());

    tokio::time::timeout(WAIT, orders.wait_for(|o| o.is_empty()))
        .await
        .expect("orders cleared")
        .unwrap();
}

#[tokio::test]
async fn switching_account_refetches() {
    let other = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
    let network = Arc::new(RecordingNetwork::new());
    network.set_orders(vec![historical_order("0x01")]);
    let (sessions, rx) = watch::channel(Session::connected(account()));
    let (mut orders, _handle) = reader(&network).follow(rx);
    tokio::time::timeout(WAIT, orders.wait_for(|o| !o.is_empty()))
        .await
        .unwrap()
        .unwrap();

    network.set_orders(vec![historical_order("0x09")]);
    sessions.send_replace(Session::connected(other));

    tokio::time::timeout(WAIT, orders.wait_for(|o| o.first().is_some_and(|o| o.id == "0x09")))
        .await
        .expect("orders refreshed")
        .unwrap();
    assert!(network
        .calls()
        .contains(&NetworkCall::GetOrders { account: other }));
}

#[tokio::test]
async fn failed_fetch_for_new_account_clears_previous_orders() {
    let other = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
    let network = Arc::new(RecordingNetwork::new());
    network.set_orders(vec![historical_order("0x01")]);
    let (sessions, rx) = watch::channel(Session::connected(account()));
    let (mut orders, _handle) = reader(&network).follow(rx);
    tokio::time::timeout(WAIT, orders.wait_for(|o| !o.is_empty()))
        .await
        .unwrap()
        .unwrap();

    network.fail_orders("subgraph down");
    sessions.send_replace(Session::connected(other));

    tokio::time::timeout(WAIT, orders.wait_for(|o| o.is_empty()))
        .await
        .expect("previous account's orders cleared")
        .unwrap();
    wait_for_query(&network, other).await;
}

#[tokio::test]
async fn failed_retry_for_same_account_keeps_orders() {
    let network = Arc::new(RecordingNetwork::new());
    network.set_orders(vec![historical_order("0x01")]);
    let (sessions, rx) = watch::channel(Session::connected(account()));
    let (mut orders, _handle) = reader(&network).follow(rx);
    tokio::time::timeout(WAIT, orders.wait_for(|o| !o.is_empty()))
        .await
        .unwrap()
        .unwrap();

    network.fail_orders("subgraph down");
    sessions.send_replace(Session::connected(account()));
    tokio::time::timeout(WAIT, async {
        while network.calls().len() < 2 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("orders re-queried");
    tokio::time::sleep(Duration::from_millis(20)).await;

    let ids: Vec<_> = orders.borrow().iter().map(|o| o.id.clone()).collect();
    assert_eq!(ids, vec!["0x01"]);
}

#[tokio::test]
async fn slow_fetch_for_previous_account_is_abandoned() {
    let other = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
    let network = Arc::new(RecordingNetwork::new());
    network.set_orders(vec![historical_order("0x01")]);
    let gate = network.gate_orders();
    let (sessions, rx) = watch::channel(Session::connected(account()));
    let (mut orders, _handle) = reader(&network).follow(rx);
    wait_for_query(&network, account()).await;

    network.set_orders(vec![historical_order("0x09")]);
    sessions.send_replace(Session::connected(other));
    tokio::time::timeout(WAIT, orders.wait_for(|o| o.first().is_some_and(|o| o.id == "0x09")))
        .await
        .expect("new account's orders published")
        .unwrap();

    // The held query was dropped along with its gate receiver.
    assert!(gate.send(()).is_err());
    tokio::time::sleep(Duration::from_millis(20)).await;
    let ids: Vec<_> = orders.borrow().iter().map(|o| o.id.clone()).collect();
    assert_eq!(ids, vec!["0x09"]);
}

#[tokio::test]
async fn rendered_lines_use_two_decimals() {
    let tokens = TokenList::polygon().unwrap();
    let line = historical_order("0x01").line(&tokens, &Utc);

    assert_eq!(line.input_amount, "2.00");
    assert_eq!(line.input_symbol, "DAI");
    assert_eq!(line.min_return, "1.00");
    assert_eq!(line.output_symbol, "PSP");
    assert_eq!(line.created, "2023-11-14 22:13:20");
}
