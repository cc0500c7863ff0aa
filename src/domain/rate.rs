//! Quote requests, rate outcomes and market-rate derivation.

use std::fmt;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::Serialize;

use super::amount::pow10;
use super::error::DomainError;

/// Decimal places kept on a market rate.
pub const RATE_DECIMALS: u32 = 5;

/// A single rate lookup: sell `amount` of `source` for `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub source: Address,
    pub destination: Address,
    /// Human-readable decimal as entered; may be empty.
    pub amount: String,
}

impl QuoteRequest {
    pub fn new(source: Address, destination: Address, amount: impl Into<String>) -> Self {
        Self {
            source,
            destination,
            amount: amount.into(),
        }
    }

    /// Whether the amount is blank, in which case no quote is fetched.
    pub fn is_blank(&self) -> bool {
        self.amount.trim().is_empty()
    }
}

/// Observable state of the latest market-rate lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum RateOutcome {
    /// Nothing requested (no amount entered).
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// Destination units per source unit.
    Rate(Decimal),
    /// The quote service refused or could not be reached.
    Error(String),
}

impl RateOutcome {
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            Self::Rate(rate) => Some(*rate),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for RateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "-"),
            Self::Pending => write!(f, "pending"),
            Self::Rate(rate) => write!(f, "{rate}"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Derive the market rate `dest / src`, rounded half-up to five places.
///
/// Works on raw base units so the 18-decimal scaling cancels out.
pub fn market_rate(src_amount: U256, dest_amount: U256) -> Result<Decimal, DomainError> {
    if src_amount.is_zero() {
        return Err(DomainError::ZeroSourceAmount);
    }

    let numerator = dest_amount
        .checked_mul(pow10(RATE_DECIMALS))
        .ok_or_else(|| DomainError::Overflow(dest_amount.to_string()))?;
    let quotient = numerator / src_amount;
    let remainder = numerator % src_amount;
    let scaled = if remainder >= src_amount - remainder {
        quotient + U256::from(1u64)
    } else {
        quotient
    };

    let mantissa = u128::try_from(scaled)
        .ok()
        .and_then(|m| i128::try_from(m).ok())
        .ok_or_else(|| DomainError::Overflow(scaled.to_string()))?;
    Decimal::try_from_i128_with_scale(mantissa, RATE_DECIMALS)
        .map_err(|e| DomainError::Overflow(e.to_string()))
}
