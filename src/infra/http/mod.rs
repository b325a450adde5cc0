pub mod api;
mod middleware;

pub use api::{ApiState, build_api_router};

use axum::{Router, http::StatusCode, middleware as axum_middleware, routing::get};
use tower_http::cors::CorsLayer;

use crate::config::CorsSettings;

/// Assemble the full application router: post API, liveness probe, request
/// context and response logging, plus CORS when enabled.
pub fn build_router(state: ApiState, cors: &CorsSettings) -> Router {
    let router = build_api_router(state)
        .route("/healthz", get(health))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context));

    if cors.allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}
