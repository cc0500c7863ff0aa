//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams to the external collaborators this crate consumes
//! but does not implement: the swap-rate aggregator and the limit-order
//! execution network.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  resolver · submitter   │
//!     ┌──────────────┤  history · desk         ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌─────────────┐                                     ┌──────────────┐
//! │ QuoteSource │                                     │  Execution   │
//! │  (ParaSwap) │                                     │   Network    │
//! └─────────────┘                                     │   (Gelato)   │
//!                                                     └──────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`QuoteSource`] - Market quotes for a token pair and amount
//! - [`ExecutionNetwork`] - Approvals, order submission and order history

mod execution;
mod quote;

pub use execution::ExecutionNetwork;
pub use quote::{QuoteResponse, QuoteSource};
