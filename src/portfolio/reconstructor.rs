//! Ledger replay into per-symbol position state
//!
//! Folds trades in ascending execution order under an average-cost model.
//! Replaying the same ordered ledger is deterministic, and replaying any
//! prefix yields a valid snapshot as of that prefix (no look-ahead).

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

use crate::ledger::types::{TradeRecord, TradeSide};
use crate::portfolio::types::PositionState;

/// Replay an ordered trade ledger into current holdings
///
/// Malformed rows (non-positive quantity, negative price) are skipped with a
/// warning; they never fail the replay. A symbol whose shares reach exactly
/// zero is dropped from the result and recreated fresh if a later buy
/// reappears, so its average cost restarts at the new buy price.
pub fn reconstruct(trades: &[TradeRecord]) -> BTreeMap<String, PositionState> {
    let mut positions: BTreeMap<String, PositionState> = BTreeMap::new();

    for trade in trades {
        if !trade.is_wellformed() {
            warn!(
                symbol = %trade.symbol,
                quantity = %trade.quantity,
                price = %trade.price,
                "Skipping malformed trade record"
            );
            continue;
        }

        let state = positions
            .entry(trade.symbol.clone())
            .or_insert_with(|| PositionState::new(&trade.symbol));

        if state.last_trade_price.is_some() {
            state.previous_trade_price = state.last_trade_price;
        }
        state.last_trade_price = Some(trade.price);
        state.traded_volume += trade.quantity;

        match trade.side {
            TradeSide::Buy => {
                state.shares_held += trade.quantity;
                state.total_cost_basis += trade.notional();
            }
            TradeSide::Sell => {
                apply_sell(state, trade.quantity);
            }
        }

        if !state.is_flat() {
            state.average_cost = state.total_cost_basis / state.shares_held;
        } else {
            // Flat position: not reported as a holding, even if the symbol
            // trades again later in the same replay
            positions.remove(&trade.symbol);
        }
    }

    positions
}

/// Reduce a position by a sell, clamping the cost-basis reduction to current
/// holdings
///
/// The reduction uses the average cost computed *before* this trade. An
/// oversell floors shares at zero rather than failing the replay; that masks
/// bad input, so it is logged loudly.
fn apply_sell(state: &mut PositionState, quantity: Decimal) {
    if quantity > state.shares_held {
        warn!(
            symbol = %state.symbol,
            sell_quantity = %quantity,
            shares_held = %state.shares_held,
            "Sell exceeds recorded holdings; clamping to current position"
        );
    }

    let reduction = quantity.min(state.shares_held);
    if reduction == state.shares_held {
        // Full close: zero the basis exactly instead of subtracting
        // reduction * average_cost, which can leave rounding residue
        state.total_cost_basis = Decimal::ZERO;
        state.shares_held = Decimal::ZERO;
    } else {
        state.total_cost_basis -= reduction * state.average_cost;
        if state.total_cost_basis < Decimal::ZERO {
            state.total_cost_basis = Decimal::ZERO;
        }
        state.shares_held -= reduction;
    }
}
