//! `submit`: place a limit order.

use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::json;

use super::{output, quote, SubmitArgs};
use crate::app::{Services, SubmitOutcome};
use crate::domain::TokenList;
use crate::error::{Error, Result};

pub async fn execute(services: &Services, tokens: &TokenList, args: &SubmitArgs) -> Result<()> {
    let desk = args.order.desk(services, tokens).await?;

    output::header(env!("CARGO_PKG_VERSION"));
    quote::render(&desk, tokens);
    if let Some(account) = desk.session().account() {
        output::field("Account", account);
    }

    if desk.can_submit() && !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Place this order?")
            .default(false)
            .interact()?;
        if !confirmed {
            output::warning("Submission cancelled");
            return Ok(());
        }
    }

    let pb = output::spinner("Submitting order...");
    let outcome = match desk.submit().await {
        Ok(outcome) => outcome,
        Err(e) => {
            output::spinner_fail(&pb, "Submission failed");
            return Err(e);
        }
    };

    match outcome {
        SubmitOutcome::Submitted(order) => {
            output::spinner_success(&pb, "Order submitted");
            if output::is_json() {
                output::json_output(json!({
                    "command": "submit",
                    "order": quote::order_json(&desk.draft(), tokens),
                    "submitted": order,
                }));
                return Ok(());
            }
            output::field("Transaction", order.tx_hash);
            output::field("Explorer", output::highlight(&order.explorer_url));
            Ok(())
        }
        SubmitOutcome::NotReady(reason) => {
            pb.finish_and_clear();
            output::hint("set WALLET_PRIVATE_KEY and the execution contract addresses to submit");
            Err(Error::NotReady(reason.to_string()))
        }
    }
}
