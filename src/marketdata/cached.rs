//! Cache-fronted market data access

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::cache::{CacheKey, DataKind, TimeSeriesCache};
use crate::config::Settings;
use crate::errors::DataError;
use crate::marketdata::provider::{MarketDataProvider, Timeframe};

/// Market data reads that go through the shared time-series cache
///
/// Quotes and bars carry their own TTLs from settings (roughly a minute and
/// an hour respectively). Cache keys follow (symbol, kind, timeframe?).
#[derive(Clone)]
pub struct CachedMarketData {
    provider: Arc<dyn MarketDataProvider>,
    cache: Arc<TimeSeriesCache<Value>>,
    settings: Settings,
}

impl CachedMarketData {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<TimeSeriesCache<Value>>,
        settings: Settings,
    ) -> Self {
        Self {
            provider,
            cache,
            settings,
        }
    }

    /// Latest quote for a symbol, cached for the quote TTL
    pub async fn quote(&self, symbol: &str) -> Result<Value, DataError> {
        let key = CacheKey::new(symbol.to_ascii_uppercase(), DataKind::Quote);
        let provider = self.provider.clone();
        let symbol = symbol.to_string();
        self.cache
            .get_or_fetch(key, self.settings.quote_ttl, move || async move {
                provider.fetch_quote(&symbol).await
            })
            .await
    }

    /// Historical bars for a symbol, cached per timeframe for the bars TTL
    pub async fn bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Value, DataError> {
        let key = CacheKey::with_sub_key(
            symbol.to_ascii_uppercase(),
            DataKind::Bars,
            timeframe.as_str(),
        );
        let provider = self.provider.clone();
        let symbol = symbol.to_string();
        self.cache
            .get_or_fetch(key, self.settings.bars_ttl, move || async move {
                provider.fetch_bars(&symbol, timeframe, start, end).await
            })
            .await
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
