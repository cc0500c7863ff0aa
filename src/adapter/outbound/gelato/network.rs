//! Gelato limit-order placement on Polygon.
//!
//! ERC-20 sells are deposited through the order router, which must first be
//! approved to pull the input amount. Native-currency sells are encoded by
//! the core contract and deposited with the amount attached as value.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::ProviderBuilder;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolValue};
use async_trait::async_trait;
use tracing::info;
use url::Url;

use super::subgraph::SubgraphClient;
use crate::app::config::{Config, ExecutionConfig};
use crate::domain::HistoricalOrder;
use crate::error::{ConfigError, Result, SubmissionError};
use crate::port::ExecutionNetwork;

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    contract IERC20OrderRouter {
        function depositToken(
            uint256 amount,
            address module,
            address inputToken,
            address owner,
            address witness,
            bytes data,
            bytes32 secret
        ) external;
    }

    #[sol(rpc)]
    contract IGelatoPineCore {
        function encodeEthOrder(
            address module,
            address inputToken,
            address owner,
            address witness,
            bytes data,
            bytes32 secret
        ) external pure returns (bytes);

        function depositEth(bytes data) external payable;
    }
}

/// Contract addresses an order needs.
#[derive(Debug, Clone, Copy)]
struct Contracts {
    order_router: Address,
    pine_core: Address,
    limit_order_module: Address,
}

/// Execution network backed by Gelato's limit-order contracts.
///
/// Without a signer the network can still read order history; approving
/// and placing orders fail.
pub struct GelatoNetwork {
    signer: Option<PrivateKeySigner>,
    rpc_url: Url,
    native_token: Address,
    chain_id: u64,
    execution: ExecutionConfig,
    subgraph: SubgraphClient,
}

impl GelatoNetwork {
    /// Build from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the private key or RPC URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let signer = match config.wallet.private_key.as_deref() {
            Some(key) => Some(PrivateKeySigner::from_str(key.trim()).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "WALLET_PRIVATE_KEY",
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let rpc_url = Url::parse(&config.network.rpc_url).map_err(|e| {
            ConfigError::InvalidValue {
                field: "network.rpc_url",
                reason: e.to_string(),
            }
        })?;

        let execution = config.execution.clone();
        let subgraph = SubgraphClient::new(
            execution.subgraph_url.clone(),
            Duration::from_millis(execution.timeout_ms),
        );

        Ok(Self {
            signer,
            rpc_url,
            native_token: config.network.native_token,
            chain_id: config.network.chain_id,
            execution,
            subgraph,
        })
    }

    /// Address of the configured wallet, if any.
    #[must_use]
    pub fn account(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }

    fn signer(&self) -> std::result::Result<&PrivateKeySigner, SubmissionError> {
        self.signer
            .as_ref()
            .ok_or_else(|| SubmissionError::SubmissionFailed("no wallet configured".into()))
    }

    /// Contract addresses are only required once an order is placed.
    fn contracts(&self) -> Result<Contracts> {
        let chain_id = self.chain_id;
        Ok(Contracts {
            order_router: self.execution.require_order_router(chain_id)?,
            pine_core: self.execution.require_pine_core(chain_id)?,
            limit_order_module: self.execution.require_limit_order_module(chain_id)?,
        })
    }
}

#[async_trait]
impl ExecutionNetwork for GelatoNetwork {
    async fn approve_token_amount(&self, token: Address, amount: U256) -> Result<()> {
        let signer = self
            .signer()
            .map_err(|e| SubmissionError::ApprovalFailed(e.to_string()))?;
        let spender = self.contracts()?.order_router;

        info!(
            address = %signer.address(),
            token = %token,
            spender = %spender,
            amount = %amount,
            "Approving token spending"
        );

        let wallet = alloy_provider::network::EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let erc20 = IERC20::new(token, &provider);
        let pending_tx = erc20.approve(spender, amount).send().await.map_err(|e| {
            SubmissionError::ApprovalFailed(format!("Failed to send approval: {e}"))
        })?;

        let receipt = pending_tx.get_receipt().await.map_err(|e| {
            SubmissionError::ApprovalFailed(format!("Failed to get receipt: {e}"))
        })?;

        info!(tx_hash = %receipt.transaction_hash, "Approval confirmed");
        Ok(())
    }

    async fn submit_limit_order(
        &self,
        src: Address,
        dest: Address,
        amount: U256,
        min_return: U256,
    ) -> Result<TxHash> {
        let signer = self.signer()?;
        let contracts = self.contracts()?;
        let owner = signer.address();

        // One-off key pair tying the order to its eventual executor.
        let witness = PrivateKeySigner::random();
        let secret = witness.to_bytes();
        let data = Bytes::from((dest, min_return).abi_encode_params());

        let wallet = alloy_provider::network::EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let pending_tx = if src == self.native_token {
            let core = IGelatoPineCore::new(contracts.pine_core, &provider);
            let payload = core
                .encodeEthOrder(
                    contracts.limit_order_module,
                    src,
                    owner,
                    witness.address(),
                    data,
                    secret,
                )
                .call()
                .await
                .map_err(|e| {
                    SubmissionError::SubmissionFailed(format!("Failed to encode order: {e}"))
                })?;
            core.depositEth(payload)
                .value(amount)
                .send()
                .await
        } else {
            let router = IERC20OrderRouter::new(contracts.order_router, &provider);
            router
                .depositToken(
                    amount,
                    contracts.limit_order_module,
                    src,
                    owner,
                    witness.address(),
                    data,
                    secret,
                )
                .send()
                .await
        }
        .map_err(|e| SubmissionError::SubmissionFailed(format!("Failed to send order: {e}")))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(tx_hash = %tx_hash, owner = %owner, "Order deposit sent");
        Ok(tx_hash)
    }

    async fn get_orders(&self, account: Address) -> Result<Vec<HistoricalOrder>> {
        self.subgraph.orders_by_owner(account).await
    }

    fn network_name(&self) -> &'static str {
        "gelato"
    }
}
