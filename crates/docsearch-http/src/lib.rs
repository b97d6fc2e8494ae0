//! Outbound HTTP client for docsearch
//!
//! A thin wrapper over a single pooled `reqwest::Client` used to talk to the
//! search backend.
//!
//! ## Features
//!
//! - **Configurable**: request and connect timeouts, proxy, user-agent
//! - **Connection pooling**: one reqwest client, built once and reused
//! - **JSON helpers**: POST a serializable body and decode the reply
//! - **Basic auth**: credentials whose `Debug` output never leaks the password

pub mod client;
pub mod config;
pub mod error;

pub use client::{BasicAuth, HttpClient};
pub use config::HttpConfig;
pub use error::{HttpError, Result};
