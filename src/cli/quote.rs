//! `quote`: market rate and minimum return for an order.

use serde_json::json;

use super::{output, OrderArgs};
use crate::app::{OrderDesk, Services};
use crate::domain::{OrderDraft, RateOutcome, TokenList};
use crate::error::Result;

pub async fn execute(services: &Services, tokens: &TokenList, args: &OrderArgs) -> Result<()> {
    let desk = args.desk(services, tokens).await?;
    let draft = desk.draft();

    if output::is_json() {
        output::json_output(json!({
            "command": "quote",
            "order": order_json(&draft, tokens),
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    render(&desk, tokens);
    Ok(())
}

/// Print the draft the way every order command shows it.
pub fn render(desk: &OrderDesk, tokens: &TokenList) {
    let draft = desk.draft();
    let source = tokens.label(&draft.source_token());
    let destination = tokens.label(&draft.destination_token());

    output::section("Order");
    output::field("Sell", format!("{} {source}", draft.amount()));
    output::field("Buy", &destination);
    output::field("Market rate", market_text(draft.market()));
    if let Some(desired) = draft.desired_rate() {
        output::field("Desired rate", desired);
    }
    match draft.min_return() {
        Some(min_return) => output::field(
            "Min return",
            output::highlight(format!("{min_return} {destination}")),
        ),
        None => output::field("Min return", output::muted("-")),
    }
}

/// JSON view of a draft.
pub fn order_json(draft: &OrderDraft, tokens: &TokenList) -> serde_json::Value {
    json!({
        "source": {
            "address": draft.source_token(),
            "symbol": tokens.label(&draft.source_token()),
        },
        "destination": {
            "address": draft.destination_token(),
            "symbol": tokens.label(&draft.destination_token()),
        },
        "amount": draft.amount(),
        "market": draft.market(),
        "desired_rate": draft.desired_rate(),
        "effective_rate": draft.effective_rate(),
        "min_return": draft.min_return(),
    })
}

fn market_text(outcome: &RateOutcome) -> String {
    match outcome {
        RateOutcome::Rate(rate) => output::highlight(rate),
        RateOutcome::Error(message) => format!("unavailable ({message})"),
        RateOutcome::Pending => output::muted("pending"),
        RateOutcome::Idle => output::muted("-"),
    }
}
