//! Market data provider trait definitions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::DataError;

/// Bar aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Minute,
    Hour,
    Day,
    Week,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Minute => "minute",
            Timeframe::Hour => "hour",
            Timeframe::Day => "day",
            Timeframe::Week => "week",
        }
    }

    /// Lenient parse used on untrusted entity bags; unknown spellings are None
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minute" | "min" | "1m" => Some(Timeframe::Minute),
            "hour" | "hr" | "1h" => Some(Timeframe::Hour),
            "day" | "daily" | "1d" => Some(Timeframe::Day),
            "week" | "weekly" | "1w" => Some(Timeframe::Week),
            _ => None,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for external quote/bar providers
///
/// Payloads are opaque JSON passed through to the caller unmodified; the
/// core never interprets them beyond caching.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get the name of the provider
    fn name(&self) -> &str;

    /// Fetch the latest quote snapshot for a symbol
    async fn fetch_quote(&self, symbol: &str) -> Result<Value, DataError>;

    /// Fetch historical bars for a symbol
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Value, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::parse("1d"), Some(Timeframe::Day));
        assert_eq!(Timeframe::parse(" Daily "), Some(Timeframe::Day));
        assert_eq!(Timeframe::parse("hour"), Some(Timeframe::Hour));
        assert_eq!(Timeframe::parse("fortnight"), None);
    }
}
