//! API route definitions

use axum::{extract::Request, middleware, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;
use utoipa::OpenApi;

use crate::{
    handlers::{health, search},
    middleware::{auth::require_api_key, logging::logging_middleware},
    state::AppState,
};

/// Routes that require the `API_KEY` header
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}

/// Routes open to anyone
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(openapi_json))
}

/// Full application router with state attached
pub fn app(state: AppState) -> Router {
    public_routes()
        .merge(protected_routes(state.clone()))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        // Browser clients on any origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// Path only; the query string carries user text.
fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, search::search),
    components(schemas(
        crate::models::HealthResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    info(
        title = "docsearch API",
        version = "1.0.0",
        description = "Hybrid BM25 + vector search over the documentation index"
    )
)]
struct ApiDoc;
