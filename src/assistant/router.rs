//! Query routing from classified intents to data sources
//!
//! The router never turns an ambiguous question into an error: unknown
//! intents, missing required entities, and ledger/balance failures all fall
//! back to a bounded, unfiltered read of recent trades, and the answer says
//! so via the `degraded` flag so callers can distinguish a full answer from
//! a fallback.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::assistant::intent::{Classification, Intent};
use crate::errors::DataError;
use crate::ledger::store::TradeFilter;
use crate::ledger::types::{BalanceRecord, TradeRecord};
use crate::service::{AccountService, FeeSummary};

/// Data selected for an answer
#[derive(Debug, Clone)]
pub enum RoutedData {
    Trades(Vec<TradeRecord>),
    Balance(BalanceRecord),
    Fees(FeeSummary),
    Market(Value),
}

/// Routed answer plus degradation status
#[derive(Debug, Clone)]
pub struct RoutedAnswer {
    pub intent: Intent,
    pub data: RoutedData,
    pub degraded: bool,
    /// Why the answer degraded, when it did
    pub note: Option<String>,
}

impl RoutedAnswer {
    fn full(intent: Intent, data: RoutedData) -> Self {
        Self {
            intent,
            data,
            degraded: false,
            note: None,
        }
    }
}

/// Maps classified intents onto the account service
pub struct QueryRouter {
    service: Arc<AccountService>,
}

impl QueryRouter {
    pub fn new(service: Arc<AccountService>) -> Self {
        Self { service }
    }

    /// Answer a classified question against one account
    ///
    /// Errors only when even the bounded fallback read fails (or when the
    /// external market-data fetch fails, which the caller may retry).
    pub async fn route(
        &self,
        account_id: &str,
        classification: &Classification,
    ) -> Result<RoutedAnswer, DataError> {
        let entities = &classification.entities;
        info!(
            account_id,
            intent = classification.intent.as_str(),
            "Routing query"
        );

        match classification.intent {
            Intent::TradeHistory => {
                let filter = self.history_filter(classification);
                match self.service.trade_history(account_id, &filter).await {
                    Ok(trades) => Ok(RoutedAnswer::full(
                        Intent::TradeHistory,
                        RoutedData::Trades(trades),
                    )),
                    Err(e) => self.fallback(account_id, Intent::TradeHistory, &e).await,
                }
            }

            Intent::AccountBalance => {
                // The primary read is already the loosest scope this source
                // offers, so there is nothing to degrade to
                let balance = self.service.latest_balance(account_id).await?;
                Ok(RoutedAnswer::full(
                    Intent::AccountBalance,
                    RoutedData::Balance(balance),
                ))
            }

            Intent::Fees => {
                let filter = self.history_filter(classification);
                match self.service.fees_summary(account_id, &filter).await {
                    Ok(summary) => {
                        Ok(RoutedAnswer::full(Intent::Fees, RoutedData::Fees(summary)))
                    }
                    Err(e) => self.fallback(account_id, Intent::Fees, &e).await,
                }
            }

            Intent::MarketData => match &entities.symbol {
                Some(symbol) => {
                    let payload = match entities.timeframe {
                        Some(timeframe) => {
                            self.service
                                .bars(symbol, timeframe, entities.since, entities.until)
                                .await?
                        }
                        None => self.service.quote(symbol).await?,
                    };
                    Ok(RoutedAnswer::full(
                        Intent::MarketData,
                        RoutedData::Market(payload),
                    ))
                }
                None => {
                    self.ambiguous_fallback(account_id, Intent::MarketData, "no symbol recognized")
                        .await
                }
            },

            Intent::Unknown => {
                self.ambiguous_fallback(account_id, Intent::Unknown, "intent unclear")
                    .await
            }
        }
    }

    fn history_filter(&self, classification: &Classification) -> TradeFilter {
        let entities = &classification.entities;
        TradeFilter {
            symbol: entities.symbol.clone(),
            since: entities.since,
            until: entities.until,
            limit: Some(
                entities
                    .limit
                    .unwrap_or(self.service.settings().default_query_limit),
            ),
        }
    }

    /// Bounded unfiltered read after a data-source failure
    async fn fallback(
        &self,
        account_id: &str,
        intent: Intent,
        cause: &DataError,
    ) -> Result<RoutedAnswer, DataError> {
        warn!(
            account_id,
            intent = intent.as_str(),
            error = %cause,
            "Primary read failed, trying bounded fallback"
        );
        self.bounded_read(account_id, intent, format!("primary read failed: {}", cause))
            .await
    }

    /// Bounded default read when the question itself is unclear
    async fn ambiguous_fallback(
        &self,
        account_id: &str,
        intent: Intent,
        reason: &str,
    ) -> Result<RoutedAnswer, DataError> {
        info!(account_id, intent = intent.as_str(), reason, "Degrading to default read");
        self.bounded_read(
            account_id,
            intent,
            format!("showing recent activity instead: {}", reason),
        )
        .await
    }

    async fn bounded_read(
        &self,
        account_id: &str,
        intent: Intent,
        note: String,
    ) -> Result<RoutedAnswer, DataError> {
        let filter = TradeFilter::with_limit(self.service.settings().fallback_limit);
        let trades = self.service.trade_history(account_id, &filter).await?;
        Ok(RoutedAnswer {
            intent,
            data: RoutedData::Trades(trades),
            degraded: true,
            note: Some(note),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::intent::EntityBag;
    use crate::cache::TimeSeriesCache;
    use crate::config::Settings;
    use crate::ledger::store::{BalanceStore, LedgerStore, SortOrder};
    use crate::marketdata::provider::{MarketDataProvider, Timeframe};
    use crate::marketdata::CachedMarketData;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    struct MemLedger {
        trades: Vec<TradeRecord>,
        fail_filtered: bool,
    }

    #[async_trait]
    impl LedgerStore for MemLedger {
        async fn list_trades(
            &self,
            _account_id: &str,
            order: SortOrder,
            filter: &TradeFilter,
        ) -> Result<Vec<TradeRecord>, DataError> {
            // Simulates a source that chokes on filtered queries but still
            // serves the bounded unfiltered fallback
            if self.fail_filtered && filter.symbol.is_some() {
                return Err(DataError::SourceUnavailable("query failed".to_string()));
            }
            let mut trades = self.trades.clone();
            trades.sort_by_key(|t| t.executed_at);
            if order == SortOrder::Descending {
                trades.reverse();
            }
            let mut trades: Vec<TradeRecord> =
                trades.into_iter().filter(|t| filter.matches(t)).collect();
            if let Some(limit) = filter.limit {
                trades.truncate(limit);
            }
            Ok(trades)
        }
    }

    struct MemBalances {
        balances: Vec<BalanceRecord>,
    }

    #[async_trait]
    impl BalanceStore for MemBalances {
        async fn list_balances(
            &self,
            _account_id: &str,
            limit: usize,
        ) -> Result<Vec<BalanceRecord>, DataError> {
            let mut balances = self.balances.clone();
            balances.sort_by(|a, b| b.date.cmp(&a.date));
            balances.truncate(limit);
            Ok(balances)
        }
    }

    struct StaticProvider;

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }
        async fn fetch_quote(&self, symbol: &str) -> Result<Value, DataError> {
            Ok(json!({ "symbol": symbol, "last": 150.25 }))
        }
        async fn fetch_bars(
            &self,
            symbol: &str,
            timeframe: Timeframe,
            _start: Option<DateTime<Utc>>,
            _end: Option<DateTime<Utc>>,
        ) -> Result<Value, DataError> {
            Ok(json!({ "symbol": symbol, "timeframe": timeframe.as_str(), "bars": [] }))
        }
    }

    fn trade(seq: i64, symbol: &str) -> TradeRecord {
        TradeRecord {
            account_id: "acct-1".to_string(),
            symbol: symbol.to_string(),
            side: crate::ledger::types::TradeSide::Buy,
            quantity: dec!(10),
            price: dec!(100),
            fee: Some(dec!(1)),
            executed_at: crate::ledger::types::parse_executed_at("2026-03-02 09:30:00").unwrap()
                + chrono::Duration::minutes(seq),
        }
    }

    fn router(fail_filtered: bool) -> QueryRouter {
        let settings = Settings::default();
        let cache = std::sync::Arc::new(TimeSeriesCache::new());
        let market =
            CachedMarketData::new(Arc::new(StaticProvider), cache.clone(), settings.clone());
        let service = AccountService::new(
            Arc::new(MemLedger {
                trades: vec![trade(0, "AAPL"), trade(1, "MSFT"), trade(2, "AAPL")],
                fail_filtered,
            }),
            Arc::new(MemBalances {
                balances: vec![BalanceRecord {
                    account_id: "acct-1".to_string(),
                    date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                    cash_balance: dec!(20_000),
                    account_equity: dec!(105_000),
                    long_market_value: dec!(85_000),
                    short_market_value: Decimal::ZERO,
                }],
            }),
            market,
            cache,
            settings,
        );
        QueryRouter::new(Arc::new(service))
    }

    fn classified(intent: Intent, entities: EntityBag) -> Classification {
        Classification { intent, entities }
    }

    #[tokio::test]
    async fn test_trade_history_with_symbol_filter() {
        let router = router(false);
        let classification = classified(
            Intent::TradeHistory,
            EntityBag {
                symbol: Some("AAPL".to_string()),
                ..EntityBag::default()
            },
        );

        let answer = router.route("acct-1", &classification).await.unwrap();
        assert!(!answer.degraded);
        match answer.data {
            RoutedData::Trades(trades) => {
                assert_eq!(trades.len(), 2);
                assert!(trades.iter().all(|t| t.symbol == "AAPL"));
            }
            other => panic!("expected trades, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_balance_intent() {
        let router = router(false);
        let answer = router
            .route("acct-1", &classified(Intent::AccountBalance, EntityBag::default()))
            .await
            .unwrap();
        assert!(!answer.degraded);
        match answer.data {
            RoutedData::Balance(balance) => assert_eq!(balance.account_equity, dec!(105_000)),
            other => panic!("expected balance, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fees_intent() {
        let router = router(false);
        let answer = router
            .route("acct-1", &classified(Intent::Fees, EntityBag::default()))
            .await
            .unwrap();
        match answer.data {
            RoutedData::Fees(summary) => {
                assert_eq!(summary.total_fees, dec!(3));
                assert_eq!(summary.trades_scanned, 3);
            }
            other => panic!("expected fees, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_market_data_with_symbol() {
        let router = router(false);
        let classification = classified(
            Intent::MarketData,
            EntityBag {
                symbol: Some("AAPL".to_string()),
                ..EntityBag::default()
            },
        );
        let answer = router.route("acct-1", &classification).await.unwrap();
        assert!(!answer.degraded);
        match answer.data {
            RoutedData::Market(payload) => assert_eq!(payload["symbol"], json!("AAPL")),
            other => panic!("expected market payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_market_data_without_symbol_degrades() {
        let router = router(false);
        let answer = router
            .route("acct-1", &classified(Intent::MarketData, EntityBag::default()))
            .await
            .unwrap();
        assert!(answer.degraded);
        assert!(answer.note.as_deref().unwrap_or("").contains("symbol"));
        assert!(matches!(answer.data, RoutedData::Trades(_)));
    }

    #[tokio::test]
    async fn test_unknown_intent_degrades_to_bounded_read() {
        let router = router(false);
        let answer = router
            .route("acct-1", &classified(Intent::Unknown, EntityBag::default()))
            .await
            .unwrap();
        assert!(answer.degraded);
        match answer.data {
            RoutedData::Trades(trades) => {
                assert!(trades.len() <= Settings::default().fallback_limit)
            }
            other => panic!("expected trades, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_failure_falls_back_instead_of_erroring() {
        let router = router(true);
        let classification = classified(
            Intent::TradeHistory,
            EntityBag {
                symbol: Some("AAPL".to_string()),
                ..EntityBag::default()
            },
        );

        let answer = router.route("acct-1", &classification).await.unwrap();
        assert!(answer.degraded);
        assert!(answer.note.as_deref().unwrap_or("").contains("primary read failed"));
        // Fallback is the unfiltered bounded read
        match answer.data {
            RoutedData::Trades(trades) => assert_eq!(trades.len(), 3),
            other => panic!("expected trades, got {:?}", other),
        }
    }
}
