//! Order subgraph GraphQL bodies.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::Deserialize;

use crate::domain::HistoricalOrder;
use crate::error::HistoryError;

/// Orders placed by one owner, newest first.
pub const ORDERS_BY_OWNER: &str = r#"
query getOrdersByOwner($owner: String) {
  orders(where: { owner: $owner }, orderBy: createdAt, orderDirection: desc) {
    id
    owner
    inputToken
    outputToken
    inputAmount
    minReturn
    status
    createdTxHash
    createdAt
  }
}
"#;

#[derive(Debug, Deserialize)]
pub struct GraphResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct OrdersData {
    pub orders: Vec<OrderDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    pub input_token: String,
    pub output_token: String,
    pub input_amount: String,
    pub min_return: String,
    pub created_at: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_tx_hash: Option<String>,
}

impl GraphResponse<OrdersData> {
    /// Orders in the order the subgraph returned them.
    pub fn into_orders(self) -> Result<Vec<HistoricalOrder>, HistoryError> {
        if let Some(first) = self.errors.first() {
            return Err(HistoryError::Query(first.message.clone()));
        }
        let data = self
            .data
            .ok_or_else(|| HistoryError::InvalidResponse("response has no data".into()))?;
        data.orders.into_iter().map(HistoricalOrder::try_from).collect()
    }
}

impl TryFrom<OrderDto> for HistoricalOrder {
    type Error = HistoryError;

    fn try_from(dto: OrderDto) -> Result<Self, Self::Error> {
        Ok(Self {
            input_token: parse_address("inputToken", &dto.input_token)?,
            output_token: parse_address("outputToken", &dto.output_token)?,
            input_amount: parse_units("inputAmount", &dto.input_amount)?,
            min_return: parse_units("minReturn", &dto.min_return)?,
            id: dto.id,
            created_at: dto.created_at,
            status: dto.status,
            created_tx_hash: dto.created_tx_hash,
        })
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, HistoryError> {
    Address::from_str(value)
        .map_err(|e| HistoryError::InvalidResponse(format!("{field} {value:?}: {e}")))
}

fn parse_units(field: &str, value: &str) -> Result<U256, HistoryError> {
    U256::from_str_radix(value, 10)
        .map_err(|e| HistoryError::InvalidResponse(format!("{field} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
      "data": {
        "orders": [
          {
            "id": "0x02",
            "owner": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "inputToken": "0x8f3cf7ad23cd3cadbd9735aff958023239c6a063",
            "outputToken": "0x42d61d766b85431666b39b89c43011f24451bff6",
            "inputAmount": "2000000000000000000",
            "minReturn": "1000000000000000000",
            "status": "open",
            "createdTxHash": "0xabc",
            "createdAt": "1700000100"
          },
          {
            "id": "0x01",
            "owner": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "inputToken": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
            "outputToken": "0x8f3cf7ad23cd3cadbd9735aff958023239c6a063",
            "inputAmount": "1",
            "minReturn": "1",
            "status": "executed",
            "createdTxHash": null,
            "createdAt": "1700000000"
          }
        ]
      }
    }"#;

    #[test]
    fn orders_keep_subgraph_order() {
        let response: GraphResponse<OrdersData> = serde_json::from_str(BODY).unwrap();
        let orders = response.into_orders().unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, "0x02");
        assert_eq!(orders[0].input_amount, U256::from(2_000_000_000_000_000_000u128));
        assert_eq!(orders[1].status.as_deref(), Some("executed"));
        assert_eq!(orders[1].created_tx_hash, None);
    }

    #[test]
    fn graphql_errors_fail_the_query() {
        let response: GraphResponse<OrdersData> =
            serde_json::from_str(r#"{"data":null,"errors":[{"message":"indexer unavailable"}]}"#)
                .unwrap();
        assert_eq!(
            response.into_orders(),
            Err(HistoryError::Query("indexer unavailable".into()))
        );
    }

    #[test]
    fn malformed_amount_is_invalid() {
        let body = BODY.replace("\"2000000000000000000\"", "\"2.5\"");
        let response: GraphResponse<OrdersData> = serde_json::from_str(&body).unwrap();
        assert!(matches!(
            response.into_orders(),
            Err(HistoryError::InvalidResponse(_))
        ));
    }
}
