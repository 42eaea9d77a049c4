//! Ledger record definitions with strong typing

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade, immutable once read from the ledger
///
/// Ordering key is `(executed_at, ingestion order)`: ascending for
/// reconstruction, descending for most-recent queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub account_id: String,
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: Decimal,
    pub price: Decimal,
    /// Commission charged on this fill, when the broker reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    pub executed_at: DateTime<Utc>,
}

impl TradeRecord {
    /// Whether this row is usable for reconstruction
    ///
    /// Malformed rows (non-positive quantity, negative price) are skipped by
    /// the reconstructor, never propagated as errors.
    pub fn is_wellformed(&self) -> bool {
        self.quantity > Decimal::ZERO && self.price >= Decimal::ZERO
    }

    /// Notional value of this fill
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// Daily account balance snapshot, append-only, one row per account per day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub account_id: String,
    pub date: NaiveDate,
    pub cash_balance: Decimal,
    pub account_equity: Decimal,
    /// Market value of long stock and option positions
    pub long_market_value: Decimal,
    pub short_market_value: Decimal,
}

impl BalanceRecord {
    /// Value tied up in positions rather than cash
    pub fn invested_value(&self) -> Decimal {
        self.long_market_value + self.short_market_value
    }
}

/// Parse an execution timestamp from the loose formats seen in broker exports
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, and a bare date. Rows with a null
/// time component normalize to midnight UTC so they still order by date.
pub fn parse_executed_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
        return Some(date.and_time(midnight).and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(quantity: Decimal, price: Decimal) -> TradeRecord {
        TradeRecord {
            account_id: "acct-1".to_string(),
            symbol: "AAPL".to_string(),
            side: TradeSide::Buy,
            quantity,
            price,
            fee: None,
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn test_wellformed_rules() {
        assert!(trade(dec!(10), dec!(100)).is_wellformed());
        assert!(trade(dec!(1), Decimal::ZERO).is_wellformed());
        assert!(!trade(Decimal::ZERO, dec!(100)).is_wellformed());
        assert!(!trade(dec!(-5), dec!(100)).is_wellformed());
        assert!(!trade(dec!(10), dec!(-1)).is_wellformed());
    }

    #[test]
    fn test_parse_executed_at_formats() {
        let rfc = parse_executed_at("2026-03-02T14:30:00Z").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2026-03-02T14:30:00+00:00");

        let plain = parse_executed_at("2026-03-02 14:30:00").unwrap();
        assert_eq!(plain, rfc);

        // Bare date normalizes to midnight UTC
        let date_only = parse_executed_at("2026-03-02").unwrap();
        assert_eq!(date_only.format("%H:%M:%S").to_string(), "00:00:00");
        assert!(date_only < rfc);

        assert!(parse_executed_at("").is_none());
        assert!(parse_executed_at("yesterday").is_none());
    }

    #[test]
    fn test_invested_value() {
        let balance = BalanceRecord {
            account_id: "acct-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            cash_balance: dec!(25_000),
            account_equity: dec!(105_000),
            long_market_value: dec!(75_000),
            short_market_value: dec!(5_000),
        };
        assert_eq!(balance.invested_value(), dec!(80_000));
    }
}
