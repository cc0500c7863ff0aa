//! `/prices` response bodies.

use alloy_primitives::U256;
use serde::Deserialize;

use crate::error::QuoteError;
use crate::port::QuoteResponse;

const NO_ROUTE: &str = "quote service returned no route";

/// Body of a `/prices` response, successful or not.
#[derive(Debug, Deserialize)]
pub struct PricesResponse {
    #[serde(rename = "priceRoute")]
    pub price_route: Option<PriceRoute>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// The part of a route the desk needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRoute {
    pub src_amount: String,
    pub dest_amount: String,
}

impl PricesResponse {
    /// A body without a route is a rejection carrying the service's message.
    pub fn into_quote(self) -> Result<QuoteResponse, QuoteError> {
        let Some(route) = self.price_route else {
            let message = self
                .error
                .or(self.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| NO_ROUTE.into());
            return Ok(QuoteResponse::Rejected { message });
        };

        Ok(QuoteResponse::Route {
            src_amount: parse_units("srcAmount", &route.src_amount)?,
            dest_amount: parse_units("destAmount", &route.dest_amount)?,
        })
    }
}

fn parse_units(field: &str, value: &str) -> Result<U256, QuoteError> {
    U256::from_str_radix(value.trim(), 10)
        .map_err(|e| QuoteError::InvalidResponse(format!("{field} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<QuoteResponse, QuoteError> {
        serde_json::from_str::<PricesResponse>(json)
            .unwrap()
            .into_quote()
    }

    #[test]
    fn route_amounts_are_base_units() {
        let quote = parse(
            r#"{"priceRoute":{"srcAmount":"2000000000000000000","destAmount":"1000000000000000000","bestRoute":[]}}"#,
        )
        .unwrap();

        assert_eq!(
            quote,
            QuoteResponse::Route {
                src_amount: U256::from(2_000_000_000_000_000_000u128),
                dest_amount: U256::from(1_000_000_000_000_000_000u128),
            }
        );
    }

    #[test]
    fn error_body_is_a_rejection() {
        let quote = parse(r#"{"error":"No routes found with enough liquidity"}"#).unwrap();
        assert_eq!(
            quote,
            QuoteResponse::Rejected {
                message: "No routes found with enough liquidity".into()
            }
        );
    }

    #[test]
    fn empty_body_is_a_generic_rejection() {
        let quote = parse("{}").unwrap();
        assert_eq!(
            quote,
            QuoteResponse::Rejected {
                message: NO_ROUTE.into()
            }
        );
    }

    #[test]
    fn non_numeric_amount_is_invalid() {
        let result = parse(r#"{"priceRoute":{"srcAmount":"1e18","destAmount":"1"}}"#);
        assert!(matches!(result, Err(QuoteError::InvalidResponse(_))));
    }
}
