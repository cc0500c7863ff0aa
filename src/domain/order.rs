//! Order drafting: effective rate, minimum return and sell-order parameters.

use alloy_primitives::{Address, U256};
use rust_decimal::{Decimal, RoundingStrategy};

use super::amount::{parse_decimal, to_base_units, to_base_units_rounded, TOKEN_DECIMALS};
use super::error::DomainError;
use super::rate::{QuoteRequest, RateOutcome};

/// Amount a draft falls back to when the destination token changes.
pub const DEFAULT_AMOUNT: &str = "1";

/// Result of combining an amount with a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposedOrder {
    min_return: Decimal,
}

impl ComposedOrder {
    /// Lowest acceptable output amount, in destination-token units.
    pub fn min_return(&self) -> Decimal {
        self.min_return
    }
}

/// Multiply an amount by a rate.
///
/// Returns `None` when either side is missing, blank or not a decimal.
pub fn compose_order(amount: Option<&str>, rate: Option<&str>) -> Option<ComposedOrder> {
    let amount = parse_decimal(amount?).ok()?;
    let rate = parse_decimal(rate?).ok()?;
    compose_decimal(amount, rate)
}

/// Multiply two decimals, normalizing away trailing zeros.
pub fn compose_decimal(amount: Decimal, rate: Decimal) -> Option<ComposedOrder> {
    amount.checked_mul(rate).map(|product| ComposedOrder {
        min_return: product.normalize(),
    })
}

/// A user override always wins over the market rate.
///
/// An override that was set but is blank or unparsable yields no rate at all;
/// it does not fall back to the market.
pub fn effective_rate(desired: Option<&str>, market: Option<Decimal>) -> Option<Decimal> {
    match desired {
        Some(desired) => parse_decimal(desired).ok(),
        None => market,
    }
}

/// Fully specified sell order, ready to hand to the execution network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitOrderParams {
    pub source_token: Address,
    pub destination_token: Address,
    pub amount: Decimal,
    pub min_return: Decimal,
}

impl LimitOrderParams {
    /// Amount to sell in base units. Rejects amounts finer than 18 places.
    pub fn input_amount(&self) -> Result<U256, DomainError> {
        to_base_units(self.amount, TOKEN_DECIMALS)
    }

    /// Minimum return in base units, truncated to 18 places.
    pub fn output_min_return(&self) -> Result<U256, DomainError> {
        to_base_units_rounded(self.min_return, TOKEN_DECIMALS, RoundingStrategy::ToZero)
    }
}

/// Editable order form state.
///
/// Inputs are kept as entered. The minimum return is always re-derived
/// from them and cannot be set directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    source_token: Address,
    destination_token: Address,
    amount: String,
    desired_rate: Option<String>,
    market: RateOutcome,
    default_amount: String,
}

impl OrderDraft {
    pub fn new(
        source_token: Address,
        destination_token: Address,
        default_amount: impl Into<String>,
    ) -> Self {
        let default_amount = default_amount.into();
        Self {
            source_token,
            destination_token,
            amount: default_amount.clone(),
            desired_rate: None,
            market: RateOutcome::Idle,
            default_amount,
        }
    }

    pub fn source_token(&self) -> Address {
        self.source_token
    }

    pub fn destination_token(&self) -> Address {
        self.destination_token
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn desired_rate(&self) -> Option<&str> {
        self.desired_rate.as_deref()
    }

    pub fn market(&self) -> &RateOutcome {
        &self.market
    }

    /// Returns whether the value changed.
    pub fn set_source_token(&mut self, token: Address) -> bool {
        let changed = self.source_token != token;
        self.source_token = token;
        changed
    }

    /// Switching the destination resets the amount to the default so a
    /// stale amount is never paired with a new rate.
    pub fn set_destination_token(&mut self, token: Address) -> bool {
        if self.destination_token == token {
            return false;
        }
        self.destination_token = token;
        self.amount = self.default_amount.clone();
        true
    }

    /// Returns whether the value changed.
    pub fn set_amount(&mut self, amount: impl Into<String>) -> bool {
        let amount = amount.into();
        let changed = self.amount != amount;
        self.amount = amount;
        changed
    }

    pub fn set_desired_rate(&mut self, rate: Option<String>) {
        self.desired_rate = rate;
    }

    pub fn apply_market(&mut self, outcome: RateOutcome) {
        self.market = outcome;
    }

    /// The quote this draft currently needs.
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest::new(self.source_token, self.destination_token, self.amount.clone())
    }

    pub fn effective_rate(&self) -> Option<Decimal> {
        effective_rate(self.desired_rate.as_deref(), self.market.rate())
    }

    /// Derived minimum return; suppressed while the market lookup failed.
    pub fn min_return(&self) -> Option<Decimal> {
        if self.market.error().is_some() {
            return None;
        }
        let amount = parse_decimal(&self.amount).ok()?;
        let rate = self.effective_rate()?;
        compose_decimal(amount, rate).map(|order| order.min_return())
    }

    /// Order parameters, present only when a minimum return is derivable.
    pub fn order_params(&self) -> Option<LimitOrderParams> {
        let min_return = self.min_return()?;
        Some(LimitOrderParams {
            source_token: self.source_token,
            destination_token: self.destination_token,
            amount: parse_decimal(&self.amount).ok()?,
            min_return,
        })
    }
}
