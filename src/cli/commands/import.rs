//! Import command: CSV ingestion into the file-backed stores
//!
//! Trade CSV columns: symbol,side,quantity,price,fee,executed_at
//! Balance CSV columns: date,cash_balance,account_equity,long_market_value,short_market_value
//!
//! Rows that fail to parse are skipped with a warning, matching how reads
//! treat malformed files.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::AppContext;
use crate::ledger::types::{parse_executed_at, BalanceRecord, TradeRecord, TradeSide};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file of trades to append to the ledger
    #[arg(long)]
    pub trades: Option<PathBuf>,

    /// CSV file of daily balance rows
    #[arg(long)]
    pub balances: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct TradeRow {
    symbol: String,
    side: String,
    quantity: Decimal,
    price: Decimal,
    #[serde(default)]
    fee: Option<Decimal>,
    executed_at: String,
}

#[derive(Debug, Deserialize)]
struct BalanceRow {
    date: NaiveDate,
    cash_balance: Decimal,
    account_equity: Decimal,
    long_market_value: Decimal,
    short_market_value: Decimal,
}

pub async fn execute(args: ImportArgs, ctx: &AppContext) -> Result<()> {
    if args.trades.is_none() && args.balances.is_none() {
        return Err(anyhow!("Nothing to import: pass --trades and/or --balances"));
    }

    if let Some(path) = &args.trades {
        let imported = import_trades(path, ctx).await?;
        println!("Imported {} trade(s) from {}", imported, path.display());
    }
    if let Some(path) = &args.balances {
        let imported = import_balances(path, ctx).await?;
        println!("Imported {} balance row(s) from {}", imported, path.display());
    }
    Ok(())
}

async fn import_trades(path: &Path, ctx: &AppContext) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow!("Cannot open {}: {}", path.display(), e))?;

    let mut trades = Vec::new();
    for (line, row) in reader.deserialize::<TradeRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping unparseable trade row");
                continue;
            }
        };
        match convert_trade(&ctx.account_id, &row) {
            Some(trade) => trades.push(trade),
            None => warn!(line = line + 2, ?row, "Skipping invalid trade row"),
        }
    }

    info!(count = trades.len(), "Parsed trade rows");
    let stored = ctx.store.store_trades(&ctx.account_id, &trades).await?;
    Ok(stored)
}

fn convert_trade(account_id: &str, row: &TradeRow) -> Option<TradeRecord> {
    let side = match row.side.trim().to_ascii_lowercase().as_str() {
        "buy" | "b" => TradeSide::Buy,
        "sell" | "s" => TradeSide::Sell,
        _ => return None,
    };
    let executed_at = parse_executed_at(&row.executed_at)?;
    let trade = TradeRecord {
        account_id: account_id.to_string(),
        symbol: row.symbol.trim().to_ascii_uppercase(),
        side,
        quantity: row.quantity,
        price: row.price,
        fee: row.fee,
        executed_at,
    };
    trade.is_wellformed().then_some(trade)
}

async fn import_balances(path: &Path, ctx: &AppContext) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| anyhow!("Cannot open {}: {}", path.display(), e))?;

    let mut imported = 0;
    for (line, row) in reader.deserialize::<BalanceRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line + 2, error = %e, "Skipping unparseable balance row");
                continue;
            }
        };
        let record = BalanceRecord {
            account_id: ctx.account_id.clone(),
            date: row.date,
            cash_balance: row.cash_balance,
            account_equity: row.account_equity,
            long_market_value: row.long_market_value,
            short_market_value: row.short_market_value,
        };
        ctx.store.store_balance(&record).await?;
        imported += 1;
    }
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(side: &str, quantity: Decimal, executed_at: &str) -> TradeRow {
        TradeRow {
            symbol: "aapl".to_string(),
            side: side.to_string(),
            quantity,
            price: dec!(100),
            fee: None,
            executed_at: executed_at.to_string(),
        }
    }

    #[test]
    fn test_convert_trade_normalizes_fields() {
        let trade = convert_trade("acct-1", &row("BUY", dec!(10), "2026-03-02")).unwrap();
        assert_eq!(trade.symbol, "AAPL");
        assert_eq!(trade.side, TradeSide::Buy);
        assert_eq!(trade.account_id, "acct-1");
    }

    #[test]
    fn test_convert_trade_rejects_bad_rows() {
        assert!(convert_trade("a", &row("hold", dec!(10), "2026-03-02")).is_none());
        assert!(convert_trade("a", &row("buy", dec!(10), "next tuesday")).is_none());
        assert!(convert_trade("a", &row("buy", dec!(0), "2026-03-02")).is_none());
        assert!(convert_trade("a", &row("buy", dec!(-5), "2026-03-02")).is_none());
    }
}
