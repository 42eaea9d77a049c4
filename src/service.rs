//! Account data service
//!
//! One explicit component holding the injected ledger reader, balance store,
//! and cache-fronted market data. Constructed once per process and passed by
//! reference; no hidden globals.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{CacheKey, DataKind, TimeSeriesCache};
use crate::config::Settings;
use crate::errors::DataError;
use crate::ledger::store::{BalanceStore, LedgerStore, SortOrder, TradeFilter};
use crate::ledger::types::{BalanceRecord, TradeRecord};
use crate::marketdata::{CachedMarketData, Timeframe};
use crate::portfolio::{reconstruct, valuate, PortfolioSnapshot};

/// Aggregate commissions over a set of trades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSummary {
    pub total_fees: Decimal,
    pub trades_with_fees: usize,
    pub trades_scanned: usize,
}

/// One point of the cached equity curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub account_equity: Decimal,
    pub cash_balance: Decimal,
}

/// Read-side service over one brokerage account's data
pub struct AccountService {
    ledger: Arc<dyn LedgerStore>,
    balances: Arc<dyn BalanceStore>,
    market: CachedMarketData,
    cache: Arc<TimeSeriesCache<Value>>,
    settings: Settings,
}

impl AccountService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        balances: Arc<dyn BalanceStore>,
        market: CachedMarketData,
        cache: Arc<TimeSeriesCache<Value>>,
        settings: Settings,
    ) -> Self {
        Self {
            ledger,
            balances,
            market,
            cache,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Latest quote for a symbol through the cache
    pub async fn quote(&self, symbol: &str) -> Result<Value, DataError> {
        self.market.quote(symbol).await
    }

    /// Historical bars for a symbol through the cache
    pub async fn bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Value, DataError> {
        self.market.bars(symbol, timeframe, start, end).await
    }

    /// Trade history, newest first
    pub async fn trade_history(
        &self,
        account_id: &str,
        filter: &TradeFilter,
    ) -> Result<Vec<TradeRecord>, DataError> {
        self.ledger
            .list_trades(account_id, SortOrder::Descending, filter)
            .await
    }

    /// Most recent balance row; explicit NoData when the history is empty
    pub async fn latest_balance(&self, account_id: &str) -> Result<BalanceRecord, DataError> {
        let mut balances = self.balances.list_balances(account_id, 1).await?;
        balances.pop().ok_or_else(|| DataError::NoData {
            account: account_id.to_string(),
            what: "balances".to_string(),
        })
    }

    /// Recent balance rows, newest first
    pub async fn recent_balances(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<BalanceRecord>, DataError> {
        self.balances.list_balances(account_id, limit).await
    }

    /// Rebuild the full portfolio snapshot from the ledger and balance rows
    ///
    /// Replays the whole ledger ascending, then combines the result with the
    /// two most recent balance rows. Fails with NoData when no balance row
    /// exists; a zero snapshot is never synthesized.
    pub async fn portfolio_snapshot(
        &self,
        account_id: &str,
    ) -> Result<PortfolioSnapshot, DataError> {
        let trades = self
            .ledger
            .list_trades(account_id, SortOrder::Ascending, &TradeFilter::all())
            .await?;
        let positions = reconstruct(&trades);
        debug!(
            account_id,
            trades = trades.len(),
            positions = positions.len(),
            "Reconstructed positions"
        );

        let balances = self.balances.list_balances(account_id, 2).await?;
        let latest = balances.first().ok_or_else(|| DataError::NoData {
            account: account_id.to_string(),
            what: "balances".to_string(),
        })?;

        let snapshot = valuate(&positions, latest, balances.get(1));
        info!(
            account_id,
            total_value = %snapshot.total_value,
            day_change = %snapshot.day_change,
            positions = snapshot.positions.len(),
            "Portfolio snapshot built"
        );
        Ok(snapshot)
    }

    /// Sum commissions over the trades matching a filter
    pub async fn fees_summary(
        &self,
        account_id: &str,
        filter: &TradeFilter,
    ) -> Result<FeeSummary, DataError> {
        let trades = self.trade_history(account_id, filter).await?;
        let trades_scanned = trades.len();
        let with_fees: Vec<Decimal> = trades.iter().filter_map(|t| t.fee).collect();
        Ok(FeeSummary {
            total_fees: with_fees.iter().copied().sum(),
            trades_with_fees: with_fees.len(),
            trades_scanned,
        })
    }

    /// Account equity history for charting, cached under the account's key
    ///
    /// The balance store is the fetch source; the cache keeps chart reloads
    /// from rescanning it for every request.
    pub async fn equity_curve(
        &self,
        account_id: &str,
        days: usize,
    ) -> Result<Value, DataError> {
        let key = CacheKey::with_sub_key(account_id, DataKind::EquityCurve, days.to_string());
        self.cache
            .get_or_fetch(key, self.settings.equity_curve_ttl, || async {
                let mut rows = self.balances.list_balances(account_id, days).await?;
                if rows.is_empty() {
                    return Err(DataError::NoData {
                        account: account_id.to_string(),
                        what: "balances".to_string(),
                    });
                }
                // Chart order: oldest first
                rows.reverse();
                let points: Vec<EquityPoint> = rows
                    .into_iter()
                    .map(|b| EquityPoint {
                        date: b.date,
                        account_equity: b.account_equity,
                        cash_balance: b.cash_balance,
                    })
                    .collect();
                serde_json::to_value(points)
                    .map_err(|e| DataError::MalformedRecord(e.to_string()))
            })
            .await
    }
}
