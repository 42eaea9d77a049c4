//! Brokerage account assistant core
//!
//! Rebuilds positions and portfolio metrics from the raw trade ledger,
//! serves quotes and bars through an expiry cache, and routes free-form
//! questions to the right data source with graceful degradation.

pub mod assistant;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data_paths;
pub mod errors;
pub mod ledger;
pub mod logging;
pub mod marketdata;
pub mod portfolio;
pub mod service;
