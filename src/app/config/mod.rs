//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `WALLET_PRIVATE_KEY`. Every section is optional;
//! omitted values fall back to Polygon defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::amount::parse_decimal;
use crate::domain::TokenList;
use crate::error::{ConfigError, Result};

mod logging;
mod network;
mod wallet;

pub use logging::LoggingConfig;
pub use network::{
    DefaultsConfig, ExecutionConfig, NetworkConfig, QuoteConfig, POLYGON_CHAIN_ID,
    POLYGON_LIMIT_ORDER_MODULE, POLYGON_ORDER_ROUTER, POLYGON_PINE_CORE,
};
pub use wallet::WalletConfig;

/// Token list source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokensConfig {
    /// Token list JSON file; the bundled Polygon list is used when unset.
    #[serde(default)]
    pub list_path: Option<PathBuf>,
}

impl TokensConfig {
    /// Load the token list once.
    pub fn load(&self) -> Result<TokenList> {
        match &self.list_path {
            Some(path) => TokenList::load(path),
            None => TokenList::polygon(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub quote: QuoteConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub tokens: TokensConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Load `path` when it exists, otherwise start from defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text, apply environment overrides and validate.
    #[allow(clippy::result_large_err)]
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        // Load private key from environment variable (never from config file for security)
        self.wallet.private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.network.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "network.chain_id",
                reason: "must be non-zero".into(),
            }
            .into());
        }
        validate_url("network.rpc_url", &self.network.rpc_url)?;
        validate_url("network.explorer_url", &self.network.explorer_url)?;
        validate_url("quote.api_url", &self.quote.api_url)?;
        validate_url("execution.subgraph_url", &self.execution.subgraph_url)?;

        if self.quote.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "quote.timeout_ms",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.execution.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "execution.timeout_ms",
                reason: "must be positive".into(),
            }
            .into());
        }

        parse_decimal(&self.defaults.amount).map_err(|e| ConfigError::InvalidValue {
            field: "defaults.amount",
            reason: e.to_string(),
        })?;

        if self.defaults.source_token == self.defaults.destination_token {
            return Err(ConfigError::InvalidValue {
                field: "defaults.destination_token",
                reason: "must differ from defaults.source_token".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn validate_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NATIVE_TOKEN;
    use crate::error::Error;

    #[test]
    fn empty_file_yields_polygon_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.network.chain_id, POLYGON_CHAIN_ID);
        assert_eq!(config.network.native_token, NATIVE_TOKEN);
        assert_eq!(config.defaults.amount, "1");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml(
            r#"
[network]
chain_id = 80002
explorer_url = "https://amoy.polygonscan.com"

[quote]
timeout_ms = 2500

[execution]
order_router = "0x1111111111111111111111111111111111111111"

[defaults]
amount = "5"
"#,
        )
        .unwrap();

        assert_eq!(config.network.chain_id, 80002);
        assert_eq!(config.quote.timeout_ms, 2500);
        assert!(config.execution.order_router.is_some());
        assert_eq!(config.defaults.amount, "5");
    }

    #[test]
    fn invalid_default_amount_is_rejected() {
        let result = Config::from_toml("[defaults]\namount = \"lots\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "defaults.amount",
                ..
            }))
        ));
    }

    #[test]
    fn zero_chain_id_is_rejected() {
        let result = Config::from_toml("[network]\nchain_id = 0\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "network.chain_id",
                ..
            }))
        ));
    }

    #[test]
    fn empty_quote_url_is_missing() {
        let result = Config::from_toml("[quote]\napi_url = \"\"\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "quote.api_url"
            }))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = Config::from_toml("[network\nchain_id = 1");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
