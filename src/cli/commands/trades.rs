//! Trades command: filtered ledger listing, newest first

use anyhow::{anyhow, Result};
use clap::Args;

use crate::cli::AppContext;
use crate::ledger::store::TradeFilter;
use crate::ledger::types::{parse_executed_at, TradeRecord};

#[derive(Args, Debug)]
pub struct TradesArgs {
    /// Only trades for this symbol
    #[arg(short, long)]
    symbol: Option<String>,

    /// Only trades executed at or after this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    since: Option<String>,

    /// Only trades executed at or before this time
    #[arg(long)]
    until: Option<String>,

    /// Maximum number of rows
    #[arg(short, long)]
    limit: Option<usize>,
}

pub async fn execute(args: TradesArgs, ctx: &AppContext) -> Result<()> {
    let filter = TradeFilter {
        symbol: args.symbol,
        since: parse_bound(args.since.as_deref())?,
        until: parse_bound(args.until.as_deref())?,
        limit: Some(args.limit.unwrap_or(ctx.service.settings().default_query_limit)),
    };

    let trades = ctx.service.trade_history(&ctx.account_id, &filter).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&trades)?);
        return Ok(());
    }

    if trades.is_empty() {
        println!("No trades found.");
        return Ok(());
    }
    print!("{}", format_trades(&trades));
    println!("{} trade(s)", trades.len());
    Ok(())
}

fn parse_bound(raw: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_executed_at(s)
            .map(Some)
            .ok_or_else(|| anyhow!("Unrecognized time '{}': use RFC 3339 or YYYY-MM-DD", s)),
    }
}

pub(crate) fn format_trades(trades: &[TradeRecord]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<20} {:<8} {:<5} {:>10} {:>10} {:>8}\n",
        "Executed", "Symbol", "Side", "Quantity", "Price", "Fee"
    ));
    output.push_str(&format!("{}\n", "-".repeat(68)));
    for trade in trades {
        output.push_str(&format!(
            "{:<20} {:<8} {:<5} {:>10.2} {:>10.2} {:>8}\n",
            trade.executed_at.format("%Y-%m-%d %H:%M:%S"),
            trade.symbol,
            trade.side,
            trade.quantity,
            trade.price,
            trade
                .fee
                .map(|f| format!("{:.2}", f))
                .unwrap_or_else(|| "-".to_string()),
        ));
    }
    output
}
