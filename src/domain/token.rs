//! Static token list: address to display metadata.

use std::path::Path;
use std::str::FromStr;

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Placeholder address standing for the chain's native currency.
pub const NATIVE_TOKEN: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

const POLYGON_TOKENS: &str = include_str!("../../assets/tokens/polygon.json");

/// A token entry from the token list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenRef {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    #[serde(default, rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenListFile {
    tokens: Vec<TokenRef>,
}

/// Immutable token list, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: Vec<TokenRef>,
}

impl TokenList {
    pub fn new(tokens: Vec<TokenRef>) -> Self {
        Self { tokens }
    }

    /// Parse a token list in the common `{ "tokens": [...] }` JSON layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TokenListFile = serde_json::from_str(json)?;
        Ok(Self::new(file.tokens))
    }

    /// Read a token list file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_json(&content)
    }

    /// The bundled Polygon list.
    pub fn polygon() -> Result<Self> {
        Self::from_json(POLYGON_TOKENS)
    }

    pub fn tokens(&self) -> &[TokenRef] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn by_address(&self, address: &Address) -> Option<&TokenRef> {
        self.tokens.iter().find(|t| &t.address == address)
    }

    /// Resolve a symbol (case-insensitive) or a hex address.
    ///
    /// Addresses resolve even when they are not on the list.
    pub fn resolve(&self, symbol_or_address: &str) -> Option<Address> {
        let needle = symbol_or_address.trim();
        if let Ok(address) = Address::from_str(needle) {
            return Some(address);
        }
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(needle))
            .map(|t| t.address)
    }

    /// Symbol for display, falling back to the checksummed address.
    pub fn label(&self, address: &Address) -> String {
        self.by_address(address)
            .map_or_else(|| address.to_checksum(None), |t| t.symbol.clone())
    }
}
