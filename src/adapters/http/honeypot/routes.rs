//! Axum router configuration for honeypot endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_session, health, process_message, request_final_output, root, HoneypotAppState,
};
use crate::adapters::http::middleware::{require_api_key, ApiKeyState};

/// Create the honeypot API router.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Service banner
/// - `GET /health` - Liveness probe
///
/// ## Protected (API key when configured)
/// - `POST /honeypot` - Process a scammer message
/// - `POST /final-output` - Build a session report
/// - `GET /session/:id` - Session snapshot
pub fn honeypot_router(state: HoneypotAppState, api_keys: ApiKeyState) -> Router {
    let protected = Router::new()
        .route("/honeypot", post(process_message))
        .route("/final-output", post(request_final_output))
        .route("/session/:id", get(get_session))
        .route_layer(middleware::from_fn_with_state(api_keys, require_api_key));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}
