//! Portfolio type definitions with strong typing

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running state for one symbol during ledger replay
///
/// Owned exclusively by the reconstructor while a replay runs. Invariants
/// held after every processed trade: `shares_held >= 0` and
/// `total_cost_basis >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub symbol: String,
    pub shares_held: Decimal,
    pub total_cost_basis: Decimal,
    /// `total_cost_basis / shares_held`; only meaningful while shares are held
    pub average_cost: Decimal,
    pub last_trade_price: Option<Decimal>,
    pub previous_trade_price: Option<Decimal>,
    /// Cumulative traded quantity across both sides
    pub traded_volume: Decimal,
}

impl PositionState {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            shares_held: Decimal::ZERO,
            total_cost_basis: Decimal::ZERO,
            average_cost: Decimal::ZERO,
            last_trade_price: None,
            previous_trade_price: None,
            traded_volume: Decimal::ZERO,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares_held.is_zero()
    }
}

/// One valued position as presented outward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub shares_held: Decimal,
    pub average_cost: Decimal,
    pub last_price: Decimal,
    /// `shares_held * last_price`
    pub market_value: Decimal,
    /// `shares_held * average_cost`
    pub total_cost: Decimal,
    pub gain_loss: Decimal,
    /// Percent of cost; 0 when total_cost is 0
    pub gain_loss_percent: Decimal,
}

/// Portfolio-level metrics, derived on each request and never stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub total_value: Decimal,
    pub day_change: Decimal,
    /// Percent vs. the previous day's equity; 0 when that equity is 0
    pub day_change_percent: Decimal,
    pub total_cash: Decimal,
    pub total_invested: Decimal,
    /// Sorted by descending market value (display contract, not a
    /// correctness invariant)
    pub positions: Vec<Position>,
    pub as_of: DateTime<Utc>,
}
