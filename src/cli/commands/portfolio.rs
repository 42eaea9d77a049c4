//! Portfolio command: reconstructed positions plus account-level metrics

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::cli::AppContext;
use crate::portfolio::{PositionsFormatter, SnapshotFormatter};

#[derive(Args, Debug)]
pub struct PortfolioArgs {
    /// Show only the positions table
    #[arg(long)]
    positions: bool,
}

pub async fn execute(args: PortfolioArgs, ctx: &AppContext) -> Result<()> {
    info!(account_id = %ctx.account_id, "Building portfolio snapshot");
    let snapshot = ctx.service.portfolio_snapshot(&ctx.account_id).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if !args.positions {
        println!("\nPortfolio for account '{}'", ctx.account_id);
        print!("{}", SnapshotFormatter::new(&snapshot).format_table());
        println!();
    }
    print!("{}", PositionsFormatter::new(&snapshot.positions).format_table());
    Ok(())
}
