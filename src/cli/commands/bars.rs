//! Bars command: historical bars for one symbol and timeframe

use anyhow::{anyhow, Result};
use clap::Args;
use tracing::info;

use crate::cli::AppContext;
use crate::ledger::types::parse_executed_at;
use crate::marketdata::Timeframe;

#[derive(Args, Debug)]
pub struct BarsArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,

    /// Bar timeframe: minute, hour, day, week
    #[arg(short, long, default_value = "day")]
    pub timeframe: String,

    /// Range start (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Range end
    #[arg(long)]
    pub end: Option<String>,
}

pub async fn execute(args: BarsArgs, ctx: &AppContext) -> Result<()> {
    let timeframe = Timeframe::parse(&args.timeframe)
        .ok_or_else(|| anyhow!("Unknown timeframe '{}'", args.timeframe))?;
    let start = parse_time(args.start.as_deref())?;
    let end = parse_time(args.end.as_deref())?;

    info!(symbol = %args.symbol, timeframe = %timeframe, "Fetching bars");
    let payload = ctx
        .service
        .bars(&args.symbol, timeframe, start, end)
        .await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn parse_time(raw: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_executed_at(s)
            .map(Some)
            .ok_or_else(|| anyhow!("Unrecognized time '{}': use RFC 3339 or YYYY-MM-DD", s)),
    }
}
