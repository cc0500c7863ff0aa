//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`quote`]: Mock [`QuoteSource`](crate::port::QuoteSource) with scripted,
//!   optionally gated replies.
//! - [`network`]: Recording [`ExecutionNetwork`](crate::port::ExecutionNetwork)
//!   with injectable failures.
//! - [`domain`]: Token addresses, unit helpers and order builders.
//! - [`config`]: Canonical test configurations.

pub mod config;
pub mod domain;
pub mod network;
pub mod quote;
