//! Shared-secret request authentication
//!
//! Every protected request must carry an `API_KEY` header equal to the
//! configured secret. The check is stateless and runs before the handler, so
//! a rejected request never reaches the search backend.

use std::{fmt, sync::Arc};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{
    config::ConfigError,
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Header carrying the shared secret. Header names are case-insensitive.
pub const API_KEY_HEADER: &str = "api_key";

/// The configured shared secret
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    /// Wrap a secret; empty secrets are rejected
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }
        Ok(Self(Arc::from(secret)))
    }

    /// Constant-time comparison against a presented key
    pub fn verify(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Reject requests whose `API_KEY` header is absent or wrong
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    // Non-ASCII header values are treated as absent
    let rejection = match request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(key) if state.api_key.verify(key) => None,
        Some(_) => Some("invalid API key"),
        None => Some("missing API key"),
    };

    match rejection {
        None => Ok(next.run(request).await),
        Some(reason) => {
            warn!(path = %request.uri().path(), "rejected request: {}", reason);
            Err(ApiError::Unauthorized(reason.to_string()))
        }
    }
}
