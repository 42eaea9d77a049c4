//! Store trait definitions for the trade ledger and balance history
//!
//! These traits abstract the queryable table store behind the engine so the
//! reconstructor and valuator stay pure functions over already-fetched rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DataError;
use crate::ledger::types::{BalanceRecord, TradeRecord};

/// Ordering of returned trade rows by execution time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first, the order reconstruction replays in
    Ascending,
    /// Newest first, for most-recent queries
    Descending,
}

/// Row filters derived from query entities
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub symbol: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl TradeFilter {
    /// Filter matching every row, no row cap
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter with only a row cap
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn matches(&self, trade: &TradeRecord) -> bool {
        if let Some(symbol) = &self.symbol {
            if !trade.symbol.eq_ignore_ascii_case(symbol) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if trade.executed_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if trade.executed_at > until {
                return false;
            }
        }
        true
    }
}

/// Read access to an account's trade ledger
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// List trades for an account ordered by execution time
    ///
    /// An account with no trades yields an empty vector; only an unreachable
    /// store is an error.
    async fn list_trades(
        &self,
        account_id: &str,
        order: SortOrder,
        filter: &TradeFilter,
    ) -> Result<Vec<TradeRecord>, DataError>;
}

/// Read access to an account's daily balance history
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// List balance rows newest-first, capped at `limit`
    ///
    /// An empty history is returned as an empty vector; callers that require
    /// data (the valuator path) turn that into `DataError::NoData`.
    async fn list_balances(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<BalanceRecord>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::TradeSide;
    use rust_decimal_macros::dec;

    fn trade(symbol: &str, executed_at: &str) -> TradeRecord {
        TradeRecord {
            account_id: "acct-1".to_string(),
            symbol: symbol.to_string(),
            side: TradeSide::Buy,
            quantity: dec!(1),
            price: dec!(10),
            fee: None,
            executed_at: crate::ledger::types::parse_executed_at(executed_at).unwrap(),
        }
    }

    #[test]
    fn test_filter_matches() {
        let t = trade("AAPL", "2026-03-02 10:00:00");

        assert!(TradeFilter::all().matches(&t));

        let by_symbol = TradeFilter {
            symbol: Some("aapl".to_string()),
            ..TradeFilter::default()
        };
        assert!(by_symbol.matches(&t));

        let other_symbol = TradeFilter {
            symbol: Some("MSFT".to_string()),
            ..TradeFilter::default()
        };
        assert!(!other_symbol.matches(&t));

        let window = TradeFilter {
            since: crate::ledger::types::parse_executed_at("2026-03-01"),
            until: crate::ledger::types::parse_executed_at("2026-03-02"),
            ..TradeFilter::default()
        };
        // Trade at 10:00 on the 2nd falls after an until of midnight on the 2nd
        assert!(!window.matches(&t));

        let wider = TradeFilter {
            since: crate::ledger::types::parse_executed_at("2026-03-01"),
            until: crate::ledger::types::parse_executed_at("2026-03-03"),
            ..TradeFilter::default()
        };
        assert!(wider.matches(&t));
    }
}
