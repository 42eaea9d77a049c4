//! Runtime settings for the assistant core
//!
//! TTLs are owned by the callers of the cache, never by the cache itself.
//! Everything here has a sensible default and can be overridden through
//! environment variables (loaded via dotenv in `main`).

use std::time::Duration;

/// Default TTL for quote/snapshot payloads
const DEFAULT_QUOTE_TTL_SECS: u64 = 60;
/// Default TTL for historical bar payloads
const DEFAULT_BARS_TTL_SECS: u64 = 3_600;
/// Default TTL for the cached account equity curve
const DEFAULT_EQUITY_CURVE_TTL_SECS: u64 = 3_600;

/// Default row limit for history queries when the caller gives none
const DEFAULT_QUERY_LIMIT: usize = 50;
/// Row limit for the router's degraded fallback read
const DEFAULT_FALLBACK_LIMIT: usize = 20;

const DEFAULT_MARKET_DATA_URL: &str = "http://localhost:8090";

/// Process-wide settings, constructed once and passed by reference
#[derive(Debug, Clone)]
pub struct Settings {
    /// TTL applied to cached quotes
    pub quote_ttl: Duration,
    /// TTL applied to cached bar series
    pub bars_ttl: Duration,
    /// TTL applied to the cached equity curve
    pub equity_curve_ttl: Duration,
    /// Row limit used when a query specifies none
    pub default_query_limit: usize,
    /// Row limit for degraded fallback reads
    pub fallback_limit: usize,
    /// Base URL of the external quote/bar provider
    pub market_data_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quote_ttl: Duration::from_secs(DEFAULT_QUOTE_TTL_SECS),
            bars_ttl: Duration::from_secs(DEFAULT_BARS_TTL_SECS),
            equity_curve_ttl: Duration::from_secs(DEFAULT_EQUITY_CURVE_TTL_SECS),
            default_query_limit: DEFAULT_QUERY_LIMIT,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            market_data_url: DEFAULT_MARKET_DATA_URL.to_string(),
        }
    }
}

impl Settings {
    /// Build settings from the environment, falling back to defaults for
    /// anything unset or unparseable
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            quote_ttl: env_secs("BROKERBOT_QUOTE_TTL_SECS").unwrap_or(defaults.quote_ttl),
            bars_ttl: env_secs("BROKERBOT_BARS_TTL_SECS").unwrap_or(defaults.bars_ttl),
            equity_curve_ttl: env_secs("BROKERBOT_EQUITY_TTL_SECS")
                .unwrap_or(defaults.equity_curve_ttl),
            default_query_limit: env_usize("BROKERBOT_QUERY_LIMIT")
                .unwrap_or(defaults.default_query_limit),
            fallback_limit: env_usize("BROKERBOT_FALLBACK_LIMIT")
                .unwrap_or(defaults.fallback_limit),
            market_data_url: std::env::var("BROKERBOT_MARKET_DATA_URL")
                .unwrap_or(defaults.market_data_url),
        }
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.quote_ttl, Duration::from_secs(60));
        assert_eq!(settings.bars_ttl, Duration::from_secs(3_600));
        assert!(settings.fallback_limit < settings.default_query_limit);
    }
}
