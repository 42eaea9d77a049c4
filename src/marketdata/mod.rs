//! External market data access
//!
//! The provider trait wraps the broker's quote/bar API and returns its JSON
//! payloads untouched; the cached wrapper fronts every fetch with the
//! time-series cache so repeat requests inside a TTL never hit the network.

pub mod cached;
pub mod client;
pub mod provider;

pub use cached::CachedMarketData;
pub use client::HttpMarketData;
pub use provider::{MarketDataProvider, Timeframe};
