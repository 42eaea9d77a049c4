//! Quote command: latest quote for one symbol, served through the cache

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cli::AppContext;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,
}

pub async fn execute(args: QuoteArgs, ctx: &AppContext) -> Result<()> {
    info!(symbol = %args.symbol, "Fetching quote");
    let payload = ctx.service.quote(&args.symbol).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
