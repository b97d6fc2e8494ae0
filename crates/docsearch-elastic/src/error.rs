//! Search gateway error types

use docsearch_http::HttpError;
use thiserror::Error;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while building, sending or reading a search
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend answered but matched nothing
    #[error("search returned no results")]
    NoResults,

    /// The top hit did not carry a field we project
    #[error("top hit is missing field '{0}'")]
    MissingField(String),

    /// Cloud id could not be decoded
    #[error("invalid cloud id: {0}")]
    InvalidCloudId(String),

    /// Neither an explicit URL nor a cloud id was configured
    #[error("no search endpoint configured: set es_url or cloud_id")]
    MissingEndpoint,

    /// Transport, status or decoding failure talking to the backend
    #[error("search request failed: {0}")]
    Http(#[from] HttpError),
}
