//! Limit Desk - limit orders priced from live market rates.
//!
//! The desk quotes a sell order against a swap-rate aggregator, derives the
//! minimum return from the market or a user-chosen rate, and places the
//! order on a limit-order execution network.
//!
//! # Architecture
//!
//! - **`domain`** - Pure order logic: decimal amounts, rates, drafts, history
//!   rendering and the token list.
//! - **`port`** - Traits the application needs from the outside world:
//!   [`QuoteSource`](port::QuoteSource) and
//!   [`ExecutionNetwork`](port::ExecutionNetwork).
//! - **`adapter`** - ParaSwap quotes and Gelato execution.
//! - **`app`** - Rate resolution, submission, history and configuration.
//! - **`cli`** - The `limit-desk` command.
//!
//! # Features
//!
//! - `gelato` (default) - On-chain order placement through Gelato's
//!   limit-order contracts. Without it the desk can quote but not submit.
//! - `testkit` - Mock ports and builders for integration tests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use limit_desk::adapter::outbound::paraswap::ParaSwapClient;
//! use limit_desk::app::RateResolver;
//! use limit_desk::domain::{QuoteRequest, NATIVE_TOKEN};
//!
//! # async fn run() {
//! let source = Arc::new(ParaSwapClient::new("https://apiv5.paraswap.io", 137));
//! let resolver = RateResolver::new(source, Duration::from_secs(10));
//! let dai = "0x8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063".parse().unwrap();
//! resolver.resolve(QuoteRequest::new(NATIVE_TOKEN, dai, "1")).await;
//! println!("{}", resolver.outcome());
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
