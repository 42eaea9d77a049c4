//! Intent classification boundary
//!
//! Classifier output arrives as loose JSON from an external model. Nothing
//! in it can be trusted: labels may be misspelled, entities may have the
//! wrong shape, whole fields may be missing. `Classification::from_untrusted`
//! normalizes all of that into typed values and maps anything unusable to
//! `Intent::Unknown` - it never fails.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::DataError;
use crate::ledger::types::parse_executed_at;
use crate::marketdata::provider::Timeframe;

/// Upper bound applied to caller-supplied row limits
const MAX_QUERY_LIMIT: usize = 500;
/// Longest symbol accepted from an entity bag
const MAX_SYMBOL_LEN: usize = 10;

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TradeHistory,
    AccountBalance,
    Fees,
    MarketData,
    Unknown,
}

impl Intent {
    /// Map a classifier label onto an intent, tolerating synonyms
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "trade_history" | "trades" | "history" => Intent::TradeHistory,
            "account_balance" | "balance" | "balances" => Intent::AccountBalance,
            "fees" | "fee" | "commissions" => Intent::Fees,
            "market_data" | "quote" | "quotes" | "price" => Intent::MarketData,
            _ => Intent::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TradeHistory => "trade_history",
            Intent::AccountBalance => "account_balance",
            Intent::Fees => "fees",
            Intent::MarketData => "market_data",
            Intent::Unknown => "unknown",
        }
    }
}

/// Typed entities extracted from a question
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityBag {
    pub symbol: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Normalized classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    pub entities: EntityBag,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            entities: EntityBag::default(),
        }
    }

    /// Normalize raw classifier JSON into a typed classification
    ///
    /// Expected shape is `{"intent": "...", "entities": {...}}` but any
    /// deviation degrades field-by-field rather than rejecting the whole
    /// payload.
    pub fn from_untrusted(raw: &Value) -> Self {
        let intent = raw
            .get("intent")
            .and_then(Value::as_str)
            .map(Intent::from_label)
            .unwrap_or(Intent::Unknown);

        let entities = raw
            .get("entities")
            .map(EntityBag::from_untrusted)
            .unwrap_or_default();

        debug!(intent = intent.as_str(), ?entities, "Normalized classification");
        Classification { intent, entities }
    }
}

impl EntityBag {
    /// Pull out whichever entities survive validation; drop the rest
    pub fn from_untrusted(raw: &Value) -> Self {
        let symbol = raw
            .get("symbol")
            .and_then(Value::as_str)
            .and_then(normalize_symbol);

        let timeframe = raw
            .get("timeframe")
            .and_then(Value::as_str)
            .and_then(Timeframe::parse);

        let since = raw
            .get("since")
            .and_then(Value::as_str)
            .and_then(parse_executed_at);
        let until = raw
            .get("until")
            .and_then(Value::as_str)
            .and_then(parse_executed_at);

        let limit = match raw.get("limit") {
            Some(Value::Number(n)) => n.as_u64().map(|n| n as usize),
            Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
            _ => None,
        }
        .filter(|&n| n > 0)
        .map(|n| n.min(MAX_QUERY_LIMIT));

        EntityBag {
            symbol,
            timeframe,
            since,
            until,
            limit,
        }
    }
}

fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    valid.then_some(symbol)
}

/// Trait for intent classifiers
///
/// The production implementation calls an external model service; the
/// keyword classifier below keeps the assistant usable offline and in tests.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification, DataError>;
}

/// Heuristic keyword classifier
///
/// Good enough for direct CLI questions; anything it cannot place becomes
/// `Unknown` and the router degrades gracefully.
pub struct KeywordClassifier;

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, DataError> {
        let lowered = text.to_ascii_lowercase();

        let intent = if lowered.contains("fee") || lowered.contains("commission") {
            Intent::Fees
        } else if lowered.contains("balance")
            || lowered.contains("equity")
            || lowered.contains("worth")
            || lowered.contains("cash")
        {
            Intent::AccountBalance
        } else if lowered.contains("quote")
            || lowered.contains("price")
            || lowered.contains("trading at")
        {
            Intent::MarketData
        } else if lowered.contains("trade")
            || lowered.contains("history")
            || lowered.contains("bought")
            || lowered.contains("sold")
        {
            Intent::TradeHistory
        } else {
            Intent::Unknown
        };

        let entities = EntityBag {
            symbol: extract_symbol(text),
            ..EntityBag::default()
        };

        Ok(Classification { intent, entities })
    }
}

/// Treat a short all-caps token as a ticker symbol
fn extract_symbol(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .find(|token| {
            (1..=5).contains(&token.len())
                && token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                && token.chars().any(|c| c.is_ascii_uppercase())
                && !matches!(*token, "I" | "A")
        })
        .map(|s| s.to_string())
}
