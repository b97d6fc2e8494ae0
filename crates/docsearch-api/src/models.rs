//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query string of `GET /search`
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text question, passed verbatim to the search backend
    pub query: Option<String>,
}

impl SearchParams {
    /// Build from raw query-string pairs, keeping the first `query` value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let query = pairs
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value);
        Self { query }
    }
}


/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since startup
    pub uptime: u64,
}
