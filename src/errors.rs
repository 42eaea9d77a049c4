//! Shared error taxonomy for the data core
//!
//! Every externally surfaced failure carries a kind plus a human-readable
//! message so callers can decide between retry and display. Malformed ledger
//! rows are deliberately *not* part of the surfaced taxonomy: the
//! reconstructor skips them and logs, it never fails a whole request over a
//! bad row.

use thiserror::Error;

/// Errors surfaced by stores, fetchers, and the portfolio engine
#[derive(Error, Debug)]
pub enum DataError {
    /// The ledger or balance store itself is unreachable. Fails the whole
    /// request; no partial snapshot is produced.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),

    /// The store answered but holds nothing for this account. Explicit by
    /// design: a missing balance history must never be silently zeroed.
    #[error("no {what} recorded for account {account}")]
    NoData { account: String, what: String },

    /// The external quote/bar provider failed. Nothing is written to the
    /// cache; the caller may retry.
    #[error("external fetch failed for {subject}: {reason}")]
    ExternalFetch { subject: String, reason: String },

    /// A record could not be decoded at a boundary. Only used where a single
    /// record is the whole request (e.g. CSV import); bulk reads skip and log.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

impl DataError {
    /// Stable machine-readable kind for callers that branch on error class
    pub fn kind(&self) -> &'static str {
        match self {
            DataError::SourceUnavailable(_) => "source_unavailable",
            DataError::NoData { .. } => "no_data",
            DataError::ExternalFetch { .. } => "external_fetch",
            DataError::MalformedRecord(_) => "malformed_record",
        }
    }

    /// Whether a retry can plausibly succeed without operator action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DataError::SourceUnavailable(_) | DataError::ExternalFetch { .. }
        )
    }
}
