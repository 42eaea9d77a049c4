//! Display formatters for portfolio data
//!
//! Plain-text tables for CLI output. Formatting only; all numbers arrive
//! already computed.

use rust_decimal::Decimal;

use crate::portfolio::types::{Position, PortfolioSnapshot};

/// Format a portfolio snapshot as a summary table
pub struct SnapshotFormatter<'a> {
    pub snapshot: &'a PortfolioSnapshot,
}

impl<'a> SnapshotFormatter<'a> {
    pub fn new(snapshot: &'a PortfolioSnapshot) -> Self {
        Self { snapshot }
    }

    /// Format as a table
    pub fn format_table(&self) -> String {
        let s = self.snapshot;
        let mut output = String::new();

        output.push_str("┌─────────────────────────┬──────────────────┐\n");
        output.push_str("│ Portfolio               │ Value            │\n");
        output.push_str("├─────────────────────────┼──────────────────┤\n");
        output.push_str(&format!("│ Total Value             │ ${:>15.2} │\n", s.total_value));
        output.push_str(&format!(
            "│ Day Change              │ {:>16} │\n",
            signed_money(s.day_change)
        ));
        output.push_str(&format!(
            "│ Day Change %            │ {:>15.2}% │\n",
            s.day_change_percent
        ));
        output.push_str(&format!("│ Cash                    │ ${:>15.2} │\n", s.total_cash));
        output.push_str(&format!("│ Invested                │ ${:>15.2} │\n", s.total_invested));
        output.push_str(&format!("│ Positions               │ {:>16} │\n", s.positions.len()));
        output.push_str("└─────────────────────────┴──────────────────┘\n");

        output
    }
}

/// Format positions as a table
pub struct PositionsFormatter<'a> {
    pub positions: &'a [Position],
}

impl<'a> PositionsFormatter<'a> {
    pub fn new(positions: &'a [Position]) -> Self {
        Self { positions }
    }

    /// Format as a table
    pub fn format_table(&self) -> String {
        if self.positions.is_empty() {
            return "No open positions.\n".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<8} {:>10} {:>10} {:>10} {:>12} {:>12} {:>9}\n",
            "Symbol", "Shares", "Avg Cost", "Last", "Mkt Value", "Gain/Loss", "G/L %"
        ));
        output.push_str(&format!("{}\n", "-".repeat(78)));

        for position in self.positions {
            output.push_str(&format!(
                "{:<8} {:>10.2} {:>10.2} {:>10.2} {:>12.2} {:>12} {:>8.2}%\n",
                position.symbol,
                position.shares_held,
                position.average_cost,
                position.last_price,
                position.market_value,
                signed_money(position.gain_loss),
                position.gain_loss_percent,
            ));
        }

        output.push_str(&format!("{}\n", "-".repeat(78)));
        let total_value: Decimal = self.positions.iter().map(|p| p.market_value).sum();
        let total_gain: Decimal = self.positions.iter().map(|p| p.gain_loss).sum();
        output.push_str(&format!(
            "Total market value: ${:.2} | Total gain/loss: {}\n",
            total_value,
            signed_money(total_gain)
        ));

        output
    }
}

fn signed_money(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format!("+${:.2}", value)
    } else {
        format!("-${:.2}", value.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn position(symbol: &str, market_value: Decimal, gain_loss: Decimal) -> Position {
        Position {
            symbol: symbol.to_string(),
            shares_held: dec!(5),
            average_cost: dec!(110),
            last_price: dec!(150),
            market_value,
            total_cost: market_value - gain_loss,
            gain_loss,
            gain_loss_percent: dec!(10),
        }
    }

    #[test]
    fn test_snapshot_table_contains_metrics() {
        let snapshot = PortfolioSnapshot {
            total_value: dec!(105_000),
            day_change: dec!(5_000),
            day_change_percent: dec!(5),
            total_cash: dec!(20_000),
            total_invested: dec!(85_000),
            positions: vec![],
            as_of: Utc::now(),
        };
        let table = SnapshotFormatter::new(&snapshot).format_table();
        assert!(table.contains("105000.00"));
        assert!(table.contains("+$5000.00"));
    }

    #[test]
    fn test_positions_table() {
        let positions = vec![
            position("AAPL", dec!(750), dec!(200)),
            position("MSFT", dec!(2800), dec!(-200)),
        ];
        let table = PositionsFormatter::new(&positions).format_table();
        assert!(table.contains("AAPL"));
        assert!(table.contains("-$200.00"));

        let empty = PositionsFormatter::new(&[]).format_table();
        assert!(empty.contains("No open positions"));
    }
}
