//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docsearch_elastic::SearchError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong `API_KEY` header
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed request
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The search ran but matched nothing
    #[error("No results found for query")]
    NoResults,

    /// The search backend failed or answered with something unusable
    #[error("Search backend error: {0}")]
    Upstream(String),

    /// Anything else
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NoResults => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NoResults => "no_results",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NoResults => ApiError::NoResults,
            SearchError::MissingField(_) | SearchError::Http(_) => {
                tracing::warn!("Search backend failed: {}", err);
                ApiError::Upstream("search backend request failed".to_string())
            }
            SearchError::InvalidCloudId(_) | SearchError::MissingEndpoint => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

/// JSON error envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Error details
    pub error: ErrorDetail,
}

/// Error kind and message
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable kind, e.g. `no_results`
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorBody {
            error: ErrorDetail {
                kind: self.kind().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use docsearch_http::HttpError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthorized("missing".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NoResults.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Upstream("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_search_errors_keep_empty_result_distinct() {
        assert!(matches!(
            ApiError::from(SearchError::NoResults),
            ApiError::NoResults
        ));
        assert!(matches!(
            ApiError::from(SearchError::MissingField("url".into())),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(SearchError::Http(HttpError::InvalidUrl("x".into()))),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(SearchError::MissingEndpoint),
            ApiError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::NoResults.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["type"], "no_results");
        assert_eq!(body["error"]["message"], "No results found for query");
    }
}
