//! CLI command implementations
//!
//! One module per command, each exposing an Args struct and an async
//! `execute(args, ctx)` entry point.

pub mod ask;
pub mod balance;
pub mod bars;
pub mod import;
pub mod portfolio;
pub mod quote;
pub mod trades;
