//! Web API for RugScan
//!
//! Exposes the aggregation controller over REST: start a scan, follow a
//! creator token, and read the current view.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

use std::sync::Arc;

use crate::aggregator::ScanController;
use crate::config::Config;

/// Shared application state for all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Owns the current query and its view
    pub controller: ScanController,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(controller: ScanController, config: Arc<Config>) -> Self {
        Self { controller, config }
    }
}
