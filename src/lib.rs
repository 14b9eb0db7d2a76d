//! RugScan: consolidated token risk reports.
//!
//! A report from the risk-report service is merged with best-effort metadata
//! from an NFT/metadata service, both for the queried mint and for every other
//! token its creator has issued.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod web;

pub use aggregator::{ScanController, ViewModel};
pub use config::Config;
pub use error::ScanError;
