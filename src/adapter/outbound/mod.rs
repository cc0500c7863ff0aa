//! Outbound adapters (driven side).

pub mod gelato;
pub mod paraswap;
