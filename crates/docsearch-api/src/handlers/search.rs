//! Search endpoint

use axum::extract::{Query, State};
use docsearch_elastic::TopHit;
use tracing::{debug, info};

use crate::{
    error::{ApiError, ApiResult},
    models::SearchParams,
    state::AppState,
};

/// Plain-text answer: body, blank line, URL
pub fn format_hit(hit: &TopHit) -> String {
    format!("{}\n\n{}", hit.body, hit.url)
}

/// Search the documentation and return the best match
#[utoipa::path(
    get,
    path = "/search",
    params(
        SearchParams,
        ("API_KEY" = String, Header, description = "Shared secret")
    ),
    responses(
        (status = 200, description = "Body of the top hit, a blank line, then its URL", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing query parameter", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorBody),
        (status = 404, description = "No document matched", body = crate::error::ErrorBody),
        (status = 502, description = "Search backend failed", body = crate::error::ErrorBody)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<String> {
    // Repeated keys are legal in a query string; the first `query` wins.
    let query = SearchParams::from_pairs(pairs)
        .query
        .ok_or_else(|| ApiError::BadRequest("missing 'query' parameter".to_string()))?;

    debug!(query_len = query.len(), "running hybrid search");

    let hit = state.backend.top_hit(&query).await?;

    info!(doc_id = ?hit.id, score = ?hit.score, url = %hit.url, "search answered");

    Ok(format_hit(&hit))
}
