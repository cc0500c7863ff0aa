//! Chain, quote-service and execution-network endpoints.

use alloy_primitives::{address, Address, TxHash};
use serde::Deserialize;
use url::Url;

use crate::domain::NATIVE_TOKEN;
use crate::error::{ConfigError, Result};

/// Polygon PoS mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com";
const DEFAULT_EXPLORER_URL: &str = "https://polygonscan.com";
const DEFAULT_QUOTE_API_URL: &str = "https://apiv5.paraswap.io";
const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/gelatodigital/limit-orders-polygon";

// DAI (PoS) and PSP on Polygon
const DEFAULT_SOURCE_TOKEN: Address = address!("8f3cf7ad23cd3cadbd9735aff958023239c6a063");
const DEFAULT_DESTINATION_TOKEN: Address = address!("42d61d766b85431666b39b89c43011f24451bff6");

/// Gelato ERC-20 order router on Polygon.
pub const POLYGON_ORDER_ROUTER: Address = address!("0c2c2963a4353ffd839590f7cb1e783688378814");
/// Gelato Pine core on Polygon.
pub const POLYGON_PINE_CORE: Address = address!("38c4092b28dab7f3d98ee6524549571c283cdfa5");
/// Gelato limit-order module on Polygon.
pub const POLYGON_LIMIT_ORDER_MODULE: Address =
    address!("5a36178e38864f5e724a2daf5f9cd9ba3f8d0dca");

/// Chain configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Block explorer base; transaction links are `{explorer_url}/tx/{hash}`.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,
    /// Sentinel address standing for the native currency.
    #[serde(default = "default_native_token")]
    pub native_token: Address,
}

const fn default_chain_id() -> u64 {
    POLYGON_CHAIN_ID
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.into()
}

fn default_explorer_url() -> String {
    DEFAULT_EXPLORER_URL.into()
}

const fn default_native_token() -> Address {
    NATIVE_TOKEN
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            rpc_url: default_rpc_url(),
            explorer_url: default_explorer_url(),
            native_token: default_native_token(),
        }
    }
}

impl NetworkConfig {
    /// Base that transaction hashes are joined onto.
    pub fn explorer_tx_base(&self) -> Result<Url> {
        let base = self.explorer_url.trim_end_matches('/');
        let url = Url::parse(&format!("{base}/tx/"))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "network.explorer_url",
                reason: "must be a hierarchical URL".into(),
            }
            .into());
        }
        Ok(url)
    }

    /// Block-explorer link for a transaction.
    pub fn explorer_tx_url(&self, tx_hash: &TxHash) -> Result<Url> {
        Ok(self.explorer_tx_base()?.join(&format!("{tx_hash:?}"))?)
    }
}

/// Quote (swap-rate aggregator) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    #[serde(default = "default_quote_api_url")]
    pub api_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_quote_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_quote_api_url() -> String {
    DEFAULT_QUOTE_API_URL.into()
}

const fn default_quote_timeout_ms() -> u64 {
    10_000
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_quote_api_url(),
            timeout_ms: default_quote_timeout_ms(),
        }
    }
}

/// Limit-order execution network configuration.
///
/// Contract addresses fall back to Gelato's deployment when the chain is
/// Polygon; on any other chain they must be configured before an order is
/// submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// GraphQL endpoint indexing placed orders.
    #[serde(default = "default_subgraph_url")]
    pub subgraph_url: String,
    /// Router receiving ERC-20 order deposits (and the approval spender).
    #[serde(default)]
    pub order_router: Option<Address>,
    /// Core contract receiving native-currency order deposits.
    #[serde(default)]
    pub pine_core: Option<Address>,
    /// Limit-order module the orders are bound to.
    #[serde(default)]
    pub limit_order_module: Option<Address>,
    /// Timeout for each approval, submission or history call, in milliseconds.
    #[serde(default = "default_execution_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_subgraph_url() -> String {
    DEFAULT_SUBGRAPH_URL.into()
}

const fn default_execution_timeout_ms() -> u64 {
    120_000
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            subgraph_url: default_subgraph_url(),
            order_router: None,
            pine_core: None,
            limit_order_module: None,
            timeout_ms: default_execution_timeout_ms(),
        }
    }
}

impl ExecutionConfig {
    pub fn require_order_router(&self, chain_id: u64) -> Result<Address> {
        resolve_contract(
            self.order_router,
            chain_id,
            POLYGON_ORDER_ROUTER,
            "execution.order_router",
        )
    }

    pub fn require_pine_core(&self, chain_id: u64) -> Result<Address> {
        resolve_contract(self.pine_core, chain_id, POLYGON_PINE_CORE, "execution.pine_core")
    }

    pub fn require_limit_order_module(&self, chain_id: u64) -> Result<Address> {
        resolve_contract(
            self.limit_order_module,
            chain_id,
            POLYGON_LIMIT_ORDER_MODULE,
            "execution.limit_order_module",
        )
    }
}

fn resolve_contract(
    configured: Option<Address>,
    chain_id: u64,
    polygon: Address,
    field: &'static str,
) -> Result<Address> {
    match configured {
        Some(address) => Ok(address),
        None if chain_id == POLYGON_CHAIN_ID => Ok(polygon),
        None => Err(ConfigError::MissingField { field }.into()),
    }
}

/// Initial order form values.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_source_token")]
    pub source_token: Address,
    #[serde(default = "default_destination_token")]
    pub destination_token: Address,
    /// Amount restored whenever the destination token changes.
    #[serde(default = "default_amount")]
    pub amount: String,
}

const fn default_source_token() -> Address {
    DEFAULT_SOURCE_TOKEN
}

const fn default_destination_token() -> Address {
    DEFAULT_DESTINATION_TOKEN
}

fn default_amount() -> String {
    crate::domain::DEFAULT_AMOUNT.into()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source_token: default_source_token(),
            destination_token: default_destination_token(),
            amount: default_amount(),
        }
    }
}
