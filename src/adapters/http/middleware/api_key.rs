//! API-key middleware for axum.
//!
//! When a key is configured every request routed through this layer must
//! carry it in the `x-api-key` header. Comparison is constant-time. With no
//! key configured the layer lets everything through.
//!
//! # Example
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/honeypot", post(handler))
//!     .route_layer(middleware::from_fn_with_state(ApiKeyState::new(key), require_api_key));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use crate::adapters::http::honeypot::ErrorResponse;
use crate::domain::foundation::ErrorCode;

/// Header carrying the client's key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware state holding the expected key, if any.
#[derive(Clone, Default)]
pub struct ApiKeyState {
    expected: Option<Arc<Secret<String>>>,
}

impl ApiKeyState {
    pub fn new(expected: Option<Secret<String>>) -> Self {
        Self {
            expected: expected.map(Arc::new),
        }
    }

    pub fn is_enforced(&self) -> bool {
        self.expected.is_some()
    }
}

/// Rejects requests whose `x-api-key` does not match the configured key.
pub async fn require_api_key(
    State(keys): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = keys.expected.as_ref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if keys_match(provided, expected.expose_secret()) {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
        let body = ErrorResponse::new(ErrorCode::Unauthorized.to_string(), "Missing or invalid API key");
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
