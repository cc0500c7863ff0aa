//! Canonical test configurations.

use alloy_primitives::{address, Address};

use crate::app::config::Config;

pub const ORDER_ROUTER: Address = address!("1111111111111111111111111111111111111111");
pub const PINE_CORE: Address = address!("2222222222222222222222222222222222222222");
pub const LIMIT_ORDER_MODULE: Address = address!("3333333333333333333333333333333333333333");

/// A complete configuration file pointing at local endpoints.
pub fn config_toml() -> String {
    format!(
        r#"
[network]
chain_id = 137
rpc_url = "http://127.0.0.1:8545"
explorer_url = "https://polygonscan.com"

[quote]
api_url = "http://127.0.0.1:9"
timeout_ms = 500

[execution]
subgraph_url = "http://127.0.0.1:9/subgraph"
order_router = "{ORDER_ROUTER}"
pine_core = "{PINE_CORE}"
limit_order_module = "{LIMIT_ORDER_MODULE}"
timeout_ms = 500

[logging]
level = "error"
"#
    )
}

/// [`config_toml`] parsed.
pub fn config() -> Config {
    Config::from_toml(&config_toml()).expect("test config parses")
}
