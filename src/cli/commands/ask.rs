//! Ask command: free-form questions routed through the assistant layer

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing::info;

use crate::assistant::{IntentClassifier, KeywordClassifier, QueryRouter, RoutedData};
use crate::cli::AppContext;
use crate::cli::commands::trades::format_trades;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question, e.g. "show my AAPL trades"
    #[arg(trailing_var_arg = true, required = true)]
    pub question: Vec<String>,
}

pub async fn execute(args: AskArgs, ctx: &AppContext) -> Result<()> {
    let question = args.question.join(" ");
    info!(%question, "Classifying question");

    let classifier = KeywordClassifier;
    let classification = classifier.classify(&question).await?;

    let router = QueryRouter::new(Arc::clone(&ctx.service));
    let answer = router.route(&ctx.account_id, &classification).await?;

    if answer.degraded {
        if let Some(note) = &answer.note {
            println!("(degraded answer: {})\n", note);
        }
    }

    match &answer.data {
        RoutedData::Trades(trades) => {
            if trades.is_empty() {
                println!("No trades found.");
            } else {
                print!("{}", format_trades(trades));
            }
        }
        RoutedData::Balance(balance) => {
            println!("Account equity as of {}: ${:.2}", balance.date, balance.account_equity);
            println!("Cash: ${:.2}  Invested: ${:.2}", balance.cash_balance, balance.invested_value());
        }
        RoutedData::Fees(summary) => {
            println!(
                "Total fees: ${:.2} across {} of {} trades",
                summary.total_fees, summary.trades_with_fees, summary.trades_scanned
            );
        }
        RoutedData::Market(payload) => {
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    }
    Ok(())
}
