//! `tokens`: the token list in use.

use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use super::output;
use crate::domain::TokenList;
use crate::error::Result;

#[derive(Tabled)]
struct TokenRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
}

pub fn execute(tokens: &TokenList) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "tokens",
            "tokens": tokens.tokens(),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&format!("Tokens ({})", tokens.len()));

    let rows: Vec<TokenRow> = tokens
        .tokens()
        .iter()
        .map(|token| TokenRow {
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            address: token.address.to_checksum(None),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    output::table(table);
    Ok(())
}
