//! ParaSwap price API, used as the market-rate source.

pub mod client;
pub mod dto;

pub use client::ParaSwapClient;
