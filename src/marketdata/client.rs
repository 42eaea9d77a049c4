//! HTTP client for the external quote/bar provider
//!
//! Endpoints:
//! - GET {base}/v1/quotes/{symbol}
//! - GET {base}/v1/bars/{symbol}?timeframe=day&start=...&end=...
//!
//! Responses are returned as raw JSON; interpretation belongs to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::errors::DataError;
use crate::marketdata::provider::{MarketDataProvider, Timeframe};

/// Market data provider backed by a plain HTTP/JSON API
pub struct HttpMarketData {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMarketData {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json(&self, url: Url, subject: &str) -> Result<Value, DataError> {
        debug!(%url, "Fetching market data");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DataError::ExternalFetch {
                subject: subject.to_string(),
                reason: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::ExternalFetch {
                subject: subject.to_string(),
                reason: format!("status {}: {}", status, body),
            });
        }

        response.json().await.map_err(|e| DataError::ExternalFetch {
            subject: subject.to_string(),
            reason: format!("invalid JSON body: {}", e),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, DataError> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| DataError::ExternalFetch {
            subject: path.to_string(),
            reason: format!("bad provider URL {}: {}", raw, e),
        })
    }
}

#[async_trait]
impl MarketDataProvider for HttpMarketData {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Value, DataError> {
        let url = self.endpoint(&format!("v1/quotes/{}", symbol))?;
        self.get_json(url, symbol).await
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Value, DataError> {
        let mut url = self.endpoint(&format!("v1/bars/{}", symbol))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("timeframe", timeframe.as_str());
            if let Some(start) = start {
                query.append_pair("start", &start.to_rfc3339());
            }
            if let Some(end) = end {
                query.append_pair("end", &end.to_rfc3339());
            }
        }
        self.get_json(url, symbol).await
    }
}
