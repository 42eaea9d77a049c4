//! File-backed ledger and balance store
//!
//! Layout under the data directory:
//! - accounts/<account_id>/trades/<epoch_millis>_<seq>.json - one trade per file
//! - accounts/<account_id>/balances/<YYYY-MM-DD>.json - one balance row per day
//!
//! Reads parse every file individually and skip unparseable ones with a
//! warning, so one corrupt row never takes down a whole query.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

use crate::data_paths::DataPaths;
use crate::errors::DataError;
use crate::ledger::store::{BalanceStore, LedgerStore, SortOrder, TradeFilter};
use crate::ledger::types::{BalanceRecord, TradeRecord};

/// JSON-file-backed store implementing both ledger and balance access
#[derive(Clone)]
pub struct FileStore {
    paths: DataPaths,
}

impl FileStore {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    /// Persist a batch of trades, one file per record
    ///
    /// File names embed the execution time and a per-batch sequence number so
    /// lexical order preserves ingestion order within a timestamp.
    pub async fn store_trades(
        &self,
        account_id: &str,
        trades: &[TradeRecord],
    ) -> Result<usize, DataError> {
        let dir = self.paths.trades(account_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("create {:?}: {}", dir, e)))?;

        let existing = count_json_files(&dir).await;
        for (i, trade) in trades.iter().enumerate() {
            let name = format!(
                "{}_{:06}.json",
                trade.executed_at.timestamp_millis(),
                existing + i
            );
            let path = dir.join(name);
            let json = serde_json::to_string_pretty(trade)
                .map_err(|e| DataError::MalformedRecord(e.to_string()))?;
            fs::write(&path, json)
                .await
                .map_err(|e| DataError::SourceUnavailable(format!("write {:?}: {}", path, e)))?;
        }

        debug!(account_id, count = trades.len(), "Stored trades");
        Ok(trades.len())
    }

    /// Persist one daily balance row, overwriting any existing row for the day
    pub async fn store_balance(&self, record: &BalanceRecord) -> Result<(), DataError> {
        let dir = self.paths.balances(&record.account_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("create {:?}: {}", dir, e)))?;

        let path = dir.join(format!("{}.json", record.date));
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| DataError::MalformedRecord(e.to_string()))?;
        fs::write(&path, json)
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("write {:?}: {}", path, e)))?;
        Ok(())
    }

    /// Load every parseable JSON file in a directory
    ///
    /// Returns (file name, contents) pairs; the file name is the tiebreak for
    /// rows sharing an execution timestamp.
    async fn load_dir(&self, dir: &PathBuf) -> Result<Vec<(String, String)>, DataError> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DataError::SourceUnavailable(format!(
                    "read {:?}: {}",
                    dir, e
                )))
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DataError::SourceUnavailable(format!("read {:?}: {}", dir, e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            match fs::read_to_string(&path).await {
                Ok(contents) => files.push((name, contents)),
                Err(e) => warn!(?path, error = %e, "Skipping unreadable file"),
            }
        }
        Ok(files)
    }
}

async fn count_json_files(dir: &PathBuf) -> usize {
    let mut count = 0;
    if let Ok(mut entries) = fs::read_dir(dir).await {
        while let Ok(Some(entry)) = entries.next_entry().await {
            if entry.path().extension().and_then(|s| s.to_str()) == Some("json") {
                count += 1;
            }
        }
    }
    count
}

#[async_trait]
impl LedgerStore for FileStore {
    async fn list_trades(
        &self,
        account_id: &str,
        order: SortOrder,
        filter: &TradeFilter,
    ) -> Result<Vec<TradeRecord>, DataError> {
        let dir = self.paths.trades(account_id);
        let files = self.load_dir(&dir).await?;

        let mut rows: Vec<(String, TradeRecord)> = Vec::with_capacity(files.len());
        for (name, contents) in files {
            match serde_json::from_str::<TradeRecord>(&contents) {
                Ok(trade) => rows.push((name, trade)),
                Err(e) => warn!(file = %name, error = %e, "Skipping malformed trade file"),
            }
        }

        rows.sort_by(|a, b| (a.1.executed_at, &a.0).cmp(&(b.1.executed_at, &b.0)));
        if order == SortOrder::Descending {
            rows.reverse();
        }

        let mut trades: Vec<TradeRecord> = rows
            .into_iter()
            .map(|(_, t)| t)
            .filter(|t| filter.matches(t))
            .collect();
        if let Some(limit) = filter.limit {
            trades.truncate(limit);
        }

        debug!(account_id, count = trades.len(), "Loaded trades");
        Ok(trades)
    }
}

#[async_trait]
impl BalanceStore for FileStore {
    async fn list_balances(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<BalanceRecord>, DataError> {
        let dir = self.paths.balances(account_id);
        let files = self.load_dir(&dir).await?;

        let mut balances: Vec<BalanceRecord> = Vec::with_capacity(files.len());
        for (name, contents) in files {
            match serde_json::from_str::<BalanceRecord>(&contents) {
                Ok(record) => balances.push(record),
                Err(e) => warn!(file = %name, error = %e, "Skipping malformed balance file"),
            }
        }

        balances.sort_by(|a, b| b.date.cmp(&a.date));
        balances.truncate(limit);
        Ok(balances)
    }
}
