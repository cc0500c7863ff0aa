//! Fixed-point conversions between human-readable decimals and base units.
//!
//! Token amounts travel on chain as integers scaled by `10^decimals`. Every
//! token handled here follows the 18-decimal convention.

use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::DomainError;

/// Decimal places used for every on-chain amount.
pub const TOKEN_DECIMALS: u32 = 18;

/// Parse a user-entered decimal string.
///
/// Surrounding whitespace is ignored. Scientific notation is rejected.
pub fn parse_decimal(value: &str) -> Result<Decimal, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidDecimal {
            value: value.to_string(),
            reason: "empty".into(),
        });
    }
    Decimal::from_str(trimmed).map_err(|e| DomainError::InvalidDecimal {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// `10^exp` as a 256-bit integer.
pub(crate) fn pow10(exp: u32) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Convert an amount to base units, rejecting amounts finer than `decimals`.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256, DomainError> {
    let normalized = amount.normalize();
    if normalized.scale() > decimals {
        return Err(DomainError::TooPrecise {
            value: amount,
            decimals,
        });
    }
    scale_up(normalized, decimals)
}

/// Convert an amount to base units, rounding extra fractional digits away.
pub fn to_base_units_rounded(
    amount: Decimal,
    decimals: u32,
    strategy: RoundingStrategy,
) -> Result<U256, DomainError> {
    scale_up(amount.round_dp_with_strategy(decimals, strategy), decimals)
}

fn scale_up(amount: Decimal, decimals: u32) -> Result<U256, DomainError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::NegativeAmount { value: amount });
    }
    let mantissa = amount.mantissa().unsigned_abs();
    let scale = amount.scale();
    if scale > decimals {
        return Err(DomainError::TooPrecise {
            value: amount,
            decimals,
        });
    }
    U256::from(mantissa)
        .checked_mul(pow10(decimals - scale))
        .ok_or_else(|| DomainError::Overflow(amount.to_string()))
}

/// Render base units as a decimal rounded half-up to `places` digits.
///
/// `format_base_units(U256::from(1_505u64) * pow10(15), 18, 2)` is `"1.51"`.
pub fn format_base_units(units: U256, decimals: u32, places: u32) -> String {
    let rounded = if places >= decimals {
        units * pow10(places - decimals)
    } else {
        let divisor = pow10(decimals - places);
        let quotient = units / divisor;
        let remainder = units % divisor;
        if remainder >= divisor - remainder {
            quotient + U256::from(1u64)
        } else {
            quotient
        }
    };

    if places == 0 {
        return rounded.to_string();
    }
    let unit = pow10(places);
    let whole = rounded / unit;
    let fraction = (rounded % unit).to_string();
    format!("{whole}.{fraction:0>width$}", width = places as usize)
}
