//! Gelato limit orders: on-chain placement and the order subgraph.
//!
//! The subgraph client only needs HTTP. Placing orders needs a signer and
//! contract bindings, which live behind the `gelato` feature.

pub mod dto;
#[cfg(feature = "gelato")]
pub mod network;
pub mod subgraph;

#[cfg(feature = "gelato")]
pub use network::GelatoNetwork;
pub use subgraph::SubgraphClient;
