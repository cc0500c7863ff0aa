//! Builders for domain primitives used across tests.

use alloy_primitives::{address, Address, U256};

use crate::domain::HistoricalOrder;

pub const DAI: Address = address!("8f3cf7ad23cd3cadbd9735aff958023239c6a063");
pub const PSP: Address = address!("42d61d766b85431666b39b89c43011f24451bff6");
pub const WETH: Address = address!("7ceb23fd6bc0add59e62ac25578270cff1b9f619");

/// A wallet account.
pub fn account() -> Address {
    address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
}

/// `n` whole tokens in base units.
pub fn units(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

/// An open DAI to PSP order with the given id.
pub fn historical_order(id: &str) -> HistoricalOrder {
    HistoricalOrder {
        id: id.to_string(),
        input_token: DAI,
        output_token: PSP,
        input_amount: units(2),
        min_return: units(1),
        created_at: "1700000000".into(),
        status: Some("open".into()),
        created_tx_hash: None,
    }
}
