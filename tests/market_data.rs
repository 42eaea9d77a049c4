//! HTTP provider tests against a mock server, including the cache's
//! single-fetch guarantee under concurrent misses.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brokerbot::cache::TimeSeriesCache;
use brokerbot::config::Settings;
use brokerbot::marketdata::{CachedMarketData, HttpMarketData, MarketDataProvider, Timeframe};

#[tokio::test]
async fn test_fetch_quote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quotes/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "AAPL",
            "last": 150.25,
            "bid": 150.20,
            "ask": 150.30
        })))
        .mount(&server)
        .await;

    let provider = HttpMarketData::new(server.uri());
    let quote = provider.fetch_quote("AAPL").await.unwrap();
    assert_eq!(quote["symbol"], json!("AAPL"));
    assert_eq!(quote["last"], json!(150.25));
}

#[tokio::test]
async fn test_fetch_bars_sends_timeframe_and_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/bars/AAPL"))
        .and(query_param("timeframe", "day"))
        .and(query_param("start", "2026-03-01T00:00:00+00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "AAPL",
            "bars": [{ "t": "2026-03-01", "c": 148.0 }]
        })))
        .mount(&server)
        .await;

    let provider = HttpMarketData::new(server.uri());
    let start = brokerbot::ledger::parse_executed_at("2026-03-01");
    let bars = provider
        .fetch_bars("AAPL", Timeframe::Day, start, None)
        .await
        .unwrap();
    assert_eq!(bars["bars"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_retryable_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quotes/AAPL"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let provider = HttpMarketData::new(server.uri());
    let err = provider.fetch_quote("AAPL").await.unwrap_err();
    assert_eq!(err.kind(), "external_fetch");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_concurrent_cache_misses_hit_upstream_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quotes/AAPL"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "symbol": "AAPL", "last": 150.25 }))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache: Arc<TimeSeriesCache<Value>> = Arc::new(TimeSeriesCache::new());
    let provider = Arc::new(HttpMarketData::new(server.uri()));
    let market = CachedMarketData::new(provider, cache.clone(), Settings::default());

    let answers =
        futures::future::join_all((0..4).map(|_| market.quote("AAPL"))).await;
    for answer in answers {
        assert_eq!(answer.unwrap()["last"], json!(150.25));
    }

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    server.verify().await;
}
