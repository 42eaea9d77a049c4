//! Balance command: latest balance row, optionally recent history

use anyhow::Result;
use clap::Args;

use crate::cli::AppContext;
use crate::ledger::types::BalanceRecord;

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Show the last N daily rows instead of just the latest
    #[arg(long)]
    history: Option<usize>,
}

pub async fn execute(args: BalanceArgs, ctx: &AppContext) -> Result<()> {
    match args.history {
        Some(days) => {
            let rows = ctx.service.recent_balances(&ctx.account_id, days).await?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("No balance history for account '{}'.", ctx.account_id);
                return Ok(());
            }
            println!(
                "{:<12} {:>14} {:>14} {:>14} {:>14}",
                "Date", "Equity", "Cash", "Long", "Short"
            );
            println!("{}", "-".repeat(72));
            for row in rows {
                println!(
                    "{:<12} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                    row.date,
                    row.account_equity,
                    row.cash_balance,
                    row.long_market_value,
                    row.short_market_value
                );
            }
        }
        None => {
            let row = ctx.service.latest_balance(&ctx.account_id).await?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&row)?);
                return Ok(());
            }
            print_latest(&ctx.account_id, &row);
        }
    }
    Ok(())
}

fn print_latest(account_id: &str, row: &BalanceRecord) {
    println!("\nAccount '{}' as of {}", account_id, row.date);
    println!("  Equity:   ${:.2}", row.account_equity);
    println!("  Cash:     ${:.2}", row.cash_balance);
    println!("  Invested: ${:.2}", row.invested_value());
}
