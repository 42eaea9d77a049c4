//! Trade ledger and balance history access
//!
//! Records are validated at this boundary so the portfolio engine only ever
//! sees well-typed `TradeRecord` / `BalanceRecord` values. Stores are
//! append-only from the engine's perspective; nothing in the core writes
//! through them.

pub mod file_store;
pub mod store;
pub mod types;

pub use file_store::FileStore;
pub use store::{BalanceStore, LedgerStore, SortOrder, TradeFilter};
pub use types::{parse_executed_at, BalanceRecord, TradeRecord, TradeSide};
