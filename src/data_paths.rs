use std::path::{Path, PathBuf};

/// Default data directory (relative to current working directory)
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Subdirectory paths relative to the data directory
pub const ACCOUNTS_DIR: &str = "accounts";
pub const LOGS_DIR: &str = "logs";

/// Per-account subdirectories
pub const TRADES_DIR: &str = "trades";
pub const BALANCES_DIR: &str = "balances";

/// Helper struct to manage data paths
#[derive(Clone, Debug)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths instance with the given root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Get the accounts directory (one subdirectory per account id)
    pub fn accounts(&self) -> PathBuf {
        self.root.join(ACCOUNTS_DIR)
    }

    /// Get the directory for a single account
    pub fn account(&self, account_id: &str) -> PathBuf {
        self.accounts().join(account_id)
    }

    /// Get the trade ledger directory for an account
    pub fn trades(&self, account_id: &str) -> PathBuf {
        self.account(account_id).join(TRADES_DIR)
    }

    /// Get the daily balance directory for an account
    pub fn balances(&self, account_id: &str) -> PathBuf {
        self.account(account_id).join(BALANCES_DIR)
    }

    /// Get the logs directory
    pub fn logs(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Ensure the shared directories exist
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.accounts())?;
        std::fs::create_dir_all(self.logs())?;
        Ok(())
    }

    /// Ensure the per-account directories exist
    pub fn ensure_account_directories(&self, account_id: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(self.trades(account_id))?;
        std::fs::create_dir_all(self.balances(account_id))?;
        Ok(())
    }
}
