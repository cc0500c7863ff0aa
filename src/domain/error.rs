//! Domain validation errors for amounts and rates.
//!
//! These errors are returned when user-entered decimals cannot be parsed or
//! cannot be represented in the fixed-point form used on chain.
//!
//! # Examples
//!
//! ```
//! use limit_desk::domain::error::DomainError;
//! use limit_desk::domain::amount::parse_decimal;
//!
//! let result = parse_decimal("one");
//! assert!(matches!(result, Err(DomainError::InvalidDecimal { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when amount or rate invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The value is empty or is not a plain decimal number.
    #[error("'{value}' is not a valid decimal: {reason}")]
    InvalidDecimal {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// Token amounts cannot be negative.
    #[error("amount must not be negative, got {value}")]
    NegativeAmount {
        /// The rejected amount.
        value: rust_decimal::Decimal,
    },

    /// The amount has more fractional digits than the token supports.
    #[error("{value} has more than {decimals} fractional digits")]
    TooPrecise {
        /// The rejected amount.
        value: rust_decimal::Decimal,
        /// Token decimals.
        decimals: u32,
    },

    /// A quote reported a zero source amount, so no rate exists.
    #[error("source amount is zero")]
    ZeroSourceAmount,

    /// The result does not fit the target representation.
    #[error("value out of range: {0}")]
    Overflow(String),
}
