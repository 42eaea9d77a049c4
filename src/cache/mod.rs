//! Expiry-based cache for externally fetched time-series data
//!
//! Keyed by (subject, kind, sub-key). Entries are written once on a miss and
//! replaced wholesale after expiry; a fresh entry is never mutated in place.
//! TTLs are supplied by the caller per fetch - the cache itself is
//! TTL-agnostic. Eviction is passive (checked on read) with an optional
//! `purge_expired` sweep to bound storage.
//!
//! Concurrent misses for the same key are serialized through a per-key
//! in-flight gate, so a miss storm triggers exactly one upstream fetch and
//! the waiters reuse its result.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::errors::DataError;

/// Kind of cached payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Quote,
    Bars,
    EquityCurve,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Quote => "quote",
            DataKind::Bars => "bars",
            DataKind::EquityCurve => "equity_curve",
        }
    }
}

/// Cache key: the subject (symbol or account), the payload kind, and an
/// optional sub-key such as a bar timeframe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub subject: String,
    pub kind: DataKind,
    pub sub_key: Option<String>,
}

impl CacheKey {
    pub fn new(subject: impl Into<String>, kind: DataKind) -> Self {
        Self {
            subject: subject.into(),
            kind,
            sub_key: None,
        }
    }

    pub fn with_sub_key(subject: impl Into<String>, kind: DataKind, sub_key: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind,
            sub_key: Some(sub_key.into()),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub_key {
            Some(sub) => write!(f, "{}:{}:{}", self.subject, self.kind.as_str(), sub),
            None => write!(f, "{}:{}", self.subject, self.kind.as_str()),
        }
    }
}

/// One cached payload with its freshness window
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    fetched_at: DateTime<Utc>,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Hit/miss counters and current size
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Generic expiry cache for opaque payloads
pub struct TimeSeriesCache<T: Clone> {
    entries: DashMap<CacheKey, CacheEntry<T>>,
    in_flight: DashMap<CacheKey, Arc<Mutex<()>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T: Clone> Default for TimeSeriesCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TimeSeriesCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached payload for `key`, fetching on miss or expiry
    ///
    /// A fresh entry is returned without invoking the fetcher. On a miss the
    /// fetcher runs, its result is stored with `expires_at = now + ttl`, and
    /// the payload is returned. A failed fetch stores nothing, so the next
    /// call retries.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        fetcher: F,
    ) -> Result<T, DataError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, DataError>>,
    {
        if let Some(payload) = self.lookup_fresh(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Cache hit");
            return Ok(payload);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        // Serialize concurrent misses per key; whoever gets the gate first
        // fetches, the rest find a fresh entry when they wake up
        let gate = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = gate.lock().await;

        if let Some(payload) = self.lookup_fresh(&key) {
            trace!(key = %key, "Cache refreshed while waiting");
            return Ok(payload);
        }

        if let Some(stale) = self.entries.get(&key) {
            let age_secs = (Utc::now() - stale.fetched_at).num_seconds();
            debug!(key = %key, age_secs, "Replacing expired entry");
        }

        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache miss, fetching");
        let result = fetcher().await;
        match result {
            Ok(payload) => {
                self.entries.insert(
                    key.clone(),
                    CacheEntry {
                        payload: payload.clone(),
                        fetched_at: Utc::now(),
                        expires_at: Instant::now() + ttl,
                    },
                );
                drop(_guard);
                self.in_flight.remove(&key);
                Ok(payload)
            }
            Err(e) => {
                drop(_guard);
                self.in_flight.remove(&key);
                Err(e)
            }
        }
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh());
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "Purged expired cache entries");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    fn lookup_fresh(&self, key: &CacheKey) -> Option<T> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.payload.clone())
    }
}
