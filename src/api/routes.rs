use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Page
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search))
        .route("/search/more", get(handlers::load_more))
        .route("/sort", get(handlers::sort))
        // Card actions
        .route("/cards/download", post(handlers::download))
        .route("/cards/copy", post(handlers::copy_link))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// JSON routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::api_search))
        .route("/results", get(handlers::api_results))
        .route("/download-url", get(handlers::api_download_url))
}
