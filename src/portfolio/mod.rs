//! Position and portfolio reconstruction engine
//!
//! Replays the raw trade ledger into current holdings under an average-cost
//! model, then combines the result with the two most recent balance rows to
//! produce portfolio-level metrics. Both passes are pure, single-pass,
//! synchronous computations over already-fetched rows.

pub mod display;
pub mod reconstructor;
pub mod types;
pub mod valuator;

pub use display::{PositionsFormatter, SnapshotFormatter};
pub use reconstructor::reconstruct;
pub use types::{Position, PortfolioSnapshot, PositionState};
pub use valuator::valuate;
