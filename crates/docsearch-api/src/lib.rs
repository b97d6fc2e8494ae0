#![warn(missing_docs)]

//! docsearch HTTP API
//!
//! Exposes `GET /search`, guarded by a shared `API_KEY` header, which runs a
//! hybrid BM25 + kNN query against Elasticsearch and answers with the top
//! hit's body text and source URL as plain text.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use middleware::auth::{ApiKey, API_KEY_HEADER};
pub use server::ApiServer;
pub use state::AppState;
