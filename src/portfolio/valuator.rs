//! Portfolio-level valuation from positions and balance history

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::ledger::types::BalanceRecord;
use crate::portfolio::types::{Position, PortfolioSnapshot, PositionState};

/// Combine reconstructed positions with the latest balance rows
///
/// `latest` is required; callers map an empty balance history to
/// `DataError::NoData` before ever reaching this point - a zero snapshot is
/// never synthesized. `previous` drives the day change and may be absent
/// (first day of history), in which case the day change is zero.
pub fn valuate(
    positions: &BTreeMap<String, PositionState>,
    latest: &BalanceRecord,
    previous: Option<&BalanceRecord>,
) -> PortfolioSnapshot {
    let total_value = latest.account_equity;

    let previous_equity = previous.map(|b| b.account_equity).unwrap_or(total_value);
    let day_change = total_value - previous_equity;
    let day_change_percent = if previous_equity.is_zero() {
        Decimal::ZERO
    } else {
        day_change / previous_equity * Decimal::ONE_HUNDRED
    };

    let mut valued: Vec<Position> = positions.values().map(value_position).collect();
    // Display contract: largest market value first
    valued.sort_by(|a, b| b.market_value.cmp(&a.market_value));

    PortfolioSnapshot {
        total_value,
        day_change,
        day_change_percent,
        total_cash: latest.cash_balance,
        total_invested: latest.invested_value(),
        positions: valued,
        as_of: Utc::now(),
    }
}

fn value_position(state: &PositionState) -> Position {
    let last_price = state.last_trade_price.unwrap_or(Decimal::ZERO);
    let market_value = state.shares_held * last_price;
    let total_cost = state.shares_held * state.average_cost;
    let gain_loss = market_value - total_cost;
    let gain_loss_percent = if total_cost.is_zero() {
        Decimal::ZERO
    } else {
        gain_loss / total_cost * Decimal::ONE_HUNDRED
    };

    Position {
        symbol: state.symbol.clone(),
        shares_held: state.shares_held,
        average_cost: state.average_cost,
        last_price,
        market_value,
        total_cost,
        gain_loss,
        gain_loss_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn balance(date: &str, equity: Decimal, cash: Decimal) -> BalanceRecord {
        BalanceRecord {
            account_id: "acct-1".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            cash_balance: cash,
            account_equity: equity,
            long_market_value: equity - cash,
            short_market_value: Decimal::ZERO,
        }
    }

    fn state(symbol: &str, shares: Decimal, avg: Decimal, last: Decimal) -> PositionState {
        PositionState {
            symbol: symbol.to_string(),
            shares_held: shares,
            total_cost_basis: shares * avg,
            average_cost: avg,
            last_trade_price: Some(last),
            previous_trade_price: None,
            traded_volume: shares,
        }
    }

    fn positions(states: Vec<PositionState>) -> BTreeMap<String, PositionState> {
        states
            .into_iter()
            .map(|s| (s.symbol.clone(), s))
            .collect()
    }

    #[test]
    fn test_day_change_example() {
        // latest equity 105_000 vs previous 100_000 => +5_000 / 5.0%
        let latest = balance("2026-03-03", dec!(105_000), dec!(20_000));
        let previous = balance("2026-03-02", dec!(100_000), dec!(20_000));

        let snapshot = valuate(&BTreeMap::new(), &latest, Some(&previous));
        assert_eq!(snapshot.total_value, dec!(105_000));
        assert_eq!(snapshot.day_change, dec!(5_000));
        assert_eq!(snapshot.day_change_percent, dec!(5.0));
        assert_eq!(snapshot.total_cash, dec!(20_000));
        assert_eq!(snapshot.total_invested, dec!(85_000));
    }

    #[test]
    fn test_no_previous_balance_means_flat_day() {
        let latest = balance("2026-03-03", dec!(105_000), dec!(20_000));
        let snapshot = valuate(&BTreeMap::new(), &latest, None);
        assert_eq!(snapshot.day_change, Decimal::ZERO);
        assert_eq!(snapshot.day_change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_zero_previous_equity_does_not_divide() {
        let latest = balance("2026-03-03", dec!(500), dec!(500));
        let previous = balance("2026-03-02", Decimal::ZERO, Decimal::ZERO);

        let snapshot = valuate(&BTreeMap::new(), &latest, Some(&previous));
        assert_eq!(snapshot.day_change, dec!(500));
        // Defined as zero rather than dividing by zero
        assert_eq!(snapshot.day_change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_position_valuation_and_sort() {
        let latest = balance("2026-03-03", dec!(105_000), dec!(20_000));
        let positions = positions(vec![
            state("AAPL", dec!(5), dec!(110), dec!(150)),
            state("MSFT", dec!(10), dec!(300), dec!(280)),
        ]);

        let snapshot = valuate(&positions, &latest, None);
        assert_eq!(snapshot.positions.len(), 2);

        // MSFT market value 2_800 sorts ahead of AAPL 750
        assert_eq!(snapshot.positions[0].symbol, "MSFT");
        assert_eq!(snapshot.positions[0].market_value, dec!(2_800));
        assert_eq!(snapshot.positions[0].gain_loss, dec!(-200));

        let aapl = &snapshot.positions[1];
        assert_eq!(aapl.market_value, dec!(750));
        assert_eq!(aapl.total_cost, dec!(550));
        assert_eq!(aapl.gain_loss, dec!(200));
        // 200 / 550 * 100
        assert!(aapl.gain_loss_percent > dec!(36.3));
        assert!(aapl.gain_loss_percent < dec!(36.4));
    }

    #[test]
    fn test_zero_cost_position_has_zero_percent() {
        let latest = balance("2026-03-03", dec!(1_000), dec!(1_000));
        let positions = positions(vec![state("GIFT", dec!(10), Decimal::ZERO, dec!(5))]);

        let snapshot = valuate(&positions, &latest, None);
        let gift = &snapshot.positions[0];
        assert_eq!(gift.market_value, dec!(50));
        assert_eq!(gift.gain_loss, dec!(50));
        assert_eq!(gift.gain_loss_percent, Decimal::ZERO);
    }
}
