//! `orders`: past orders of an account.

use chrono::Local;
use serde_json::json;
use tabled::{settings::Style, Table, Tabled};

use super::{output, OrdersArgs};
use crate::app::Services;
use crate::domain::{OrderLine, TokenList};
use crate::error::Result;

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Sell")]
    sell: String,
    #[tabled(rename = "Min return")]
    min_return: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&OrderLine> for OrderRow {
    fn from(line: &OrderLine) -> Self {
        Self {
            sell: format!("{} {}", line.input_amount, line.input_symbol),
            min_return: format!("{} {}", line.min_return, line.output_symbol),
            created: line.created.clone(),
            status: line.status.clone(),
        }
    }
}

pub async fn execute(services: &Services, tokens: &TokenList, args: &OrdersArgs) -> Result<()> {
    let account = args.account.or_else(|| services.session().account());
    let Some(account) = account else {
        output::warning("No account to list orders for");
        output::hint("pass --account or set WALLET_PRIVATE_KEY");
        return Ok(());
    };

    let pb = output::spinner("Fetching orders...");
    let orders = match services.history().fetch(Some(account)).await {
        Ok(orders) => {
            output::spinner_success(&pb, &format!("Fetched {} orders", orders.len()));
            orders
        }
        Err(e) => {
            output::spinner_fail(&pb, "Failed to fetch orders");
            return Err(e);
        }
    };

    let lines: Vec<OrderLine> = orders.iter().map(|o| o.line(tokens, &Local)).collect();

    if output::is_json() {
        output::json_output(json!({
            "command": "orders",
            "account": account,
            "orders": lines,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section(&format!("Orders for {account}"));
    if lines.is_empty() {
        output::hint("no orders yet");
        return Ok(());
    }
    let rows: Vec<OrderRow> = lines.iter().map(OrderRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    output::table(table);
    Ok(())
}
