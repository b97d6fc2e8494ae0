//! Application state for the API server

use std::{sync::Arc, time::Instant};

use docsearch_elastic::SearchBackend;

use crate::middleware::auth::ApiKey;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Search backend, built once at startup
    pub backend: Arc<dyn SearchBackend>,
    /// Secret every `/search` request must present
    pub api_key: ApiKey,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(backend: Arc<dyn SearchBackend>, api_key: ApiKey) -> Self {
        Self {
            backend,
            api_key,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
