//! Historical orders as reported by the execution network.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use super::amount::{format_base_units, TOKEN_DECIMALS};
use super::token::TokenList;

/// Decimal places shown for historical amounts.
pub const DISPLAY_DECIMALS: u32 = 2;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A past order. Read-only; display strings are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalOrder {
    pub id: String,
    pub input_token: Address,
    pub output_token: Address,
    /// Base units.
    pub input_amount: U256,
    /// Base units.
    pub min_return: U256,
    /// Seconds since the epoch, as reported.
    pub created_at: String,
    pub status: Option<String>,
    pub created_tx_hash: Option<String>,
}

/// One rendered history line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub id: String,
    pub input_amount: String,
    pub input_symbol: String,
    pub min_return: String,
    pub output_symbol: String,
    pub created: String,
    pub status: String,
}

/// Base units to a two-place decimal string.
pub fn format_amount(units: U256) -> String {
    format_base_units(units, TOKEN_DECIMALS, DISPLAY_DECIMALS)
}

/// Epoch seconds (as text) to a date-time string in `tz`.
///
/// Values that are not a valid timestamp are returned unchanged.
pub fn format_created_at<Tz>(seconds: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    seconds
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map_or_else(
            || seconds.to_string(),
            |utc| utc.with_timezone(tz).format(DATE_FORMAT).to_string(),
        )
}

impl HistoricalOrder {
    /// Render for display in `tz`, labelling tokens from `tokens`.
    pub fn line<Tz>(&self, tokens: &TokenList, tz: &Tz) -> OrderLine
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        OrderLine {
            id: self.id.clone(),
            input_amount: format_amount(self.input_amount),
            input_symbol: tokens.label(&self.input_token),
            min_return: format_amount(self.min_return),
            output_symbol: tokens.label(&self.output_token),
            created: format_created_at(&self.created_at, tz),
            status: self.status.clone().unwrap_or_else(|| "-".into()),
        }
    }
}
