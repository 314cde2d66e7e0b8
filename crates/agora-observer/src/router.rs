//! Axum router construction for the HTTP API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// See [`handlers`] for the endpoint table. CORS allows any origin so a
/// browser dashboard on another port can read the API.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/stats", get(handlers::stats))
        // Societies
        .route("/api/societies", get(handlers::list_societies))
        .route("/api/societies/{id}", get(handlers::get_society))
        .route("/api/societies/{id}/events", get(handlers::list_events))
        .route("/api/societies/{id}/decisions", post(handlers::submit_decision))
        .route("/api/societies/{id}/messages", post(handlers::submit_message))
        .route("/api/societies/{id}/evolution", get(handlers::get_evolution))
        .route("/api/societies/{id}/digest", get(handlers::get_digest))
        // Economy
        .route("/api/economy", get(handlers::get_economy))
        // Agents
        .route("/api/agents/register", post(handlers::register_agent))
        .route("/api/agents/{name}", get(handlers::get_agent))
        .route(
            "/api/agents/{name}/join/{society}",
            post(handlers::join_society),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
