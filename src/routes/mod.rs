use axum::{http::StatusCode, middleware::from_fn, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod auth;
pub mod moods;
pub mod movies;
pub mod recommendations;

/// Creates the application router with all routes
///
/// The session layer is injected so binaries and tests can pick their own
/// store (Postgres in production, in-memory in tests).
pub fn create_router<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth::router())
        .nest("/moods", moods::router())
        .nest("/movies", movies::router())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
