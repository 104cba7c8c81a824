//! HTTP gateway (Axum) for duplicate checks and corpus grouping.
//!
//! This module is primarily used by the `doppel` server binary.

pub mod auth;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod payload;
pub mod rate_limit;
pub mod state;


use axum::{
    Json, Router,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use doppel::constants::{DOPPEL_STATUS_HEADER, DOPPEL_STATUS_HEALTHY};

pub use handler::{check_similarity_handler, group_similar_questions_handler, login_handler};
pub use state::HandlerState;

use payload::HealthResponse;

pub fn create_router_with_state(state: HandlerState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .route("/check_similarity", post(check_similarity_handler))
        .route(
            "/group_similar_questions",
            post(group_similar_questions_handler),
        )
        .layer(from_fn(middleware::client_key))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::request_id))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(parsed))
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        DOPPEL_STATUS_HEADER,
        HeaderValue::from_static(DOPPEL_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: "api_healthy",
        }),
    )
        .into_response()
}
