//! HTTP handlers for honeypot endpoints.
//!
//! These handlers connect Axum routes to the session store.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::SessionStore;
use crate::domain::final_output::FinalOutput;
use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::domain::session::{SessionError, SessionState};
use crate::ports::FinalOutputSink;

use super::dto::{
    ErrorResponse, FinalOutputRequest, HealthResponse, HoneypotRequest, HoneypotResponse,
    RootResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for honeypot handlers.
#[derive(Clone)]
pub struct HoneypotAppState {
    pub store: Arc<SessionStore>,
    /// Receives final outputs emitted during turns, when configured.
    pub sink: Option<Arc<dyn FinalOutputSink>>,
}

impl HoneypotAppState {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store, sink: None }
    }

    pub fn with_sink(mut self, sink: Arc<dyn FinalOutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Delivers a report in the background; failures are only logged.
    fn dispatch(&self, output: FinalOutput) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = sink.submit(&output).await {
                tracing::warn!(
                    session_id = %output.session_id,
                    turn = output.turn_count,
                    error = %e,
                    "Final output delivery failed"
                );
            }
        });
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Service Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Service banner
pub async fn root() -> impl IntoResponse {
    Json(RootResponse::default())
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

// ════════════════════════════════════════════════════════════════════════════════
// Honeypot Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /honeypot - Process one scammer message and return the persona reply
pub async fn process_message(
    State(state): State<HoneypotAppState>,
    body: Result<Json<HoneypotRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HoneypotApiError> {
    let Json(request) = body?;
    let command = request.into_command()?;

    let outcome = state.store.process_turn(command).await?;

    if let Some(output) = outcome.final_output {
        state.dispatch(output);
    }

    Ok(Json(HoneypotResponse::success(outcome.reply)))
}

/// POST /final-output - Build a report for a session on demand
pub async fn request_final_output(
    State(state): State<HoneypotAppState>,
    body: Result<Json<FinalOutputRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HoneypotApiError> {
    let Json(request) = body?;
    let session_id = SessionId::new(request.session_id)?;

    let output = state.store.final_output(&session_id).await?;
    Ok(Json(output))
}

/// GET /session/:id - Debug snapshot of a session
pub async fn get_session(
    State(state): State<HoneypotAppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionState>, HoneypotApiError> {
    let session_id = SessionId::new(id)?;
    let snapshot = state.store.get_session(&session_id).await?;
    Ok(Json(snapshot))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub enum HoneypotApiError {
    Session(SessionError),
    /// Body was not valid JSON for the endpoint.
    MalformedBody(String),
}

impl From<SessionError> for HoneypotApiError {
    fn from(err: SessionError) -> Self {
        HoneypotApiError::Session(err)
    }
}

impl From<ValidationError> for HoneypotApiError {
    fn from(err: ValidationError) -> Self {
        HoneypotApiError::Session(err.into())
    }
}

impl From<JsonRejection> for HoneypotApiError {
    fn from(rejection: JsonRejection) -> Self {
        HoneypotApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for HoneypotApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            HoneypotApiError::Session(err) => {
                let status = match err {
                    SessionError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                    SessionError::UnknownSession(_) => StatusCode::NOT_FOUND,
                };
                (status, err.code(), err.message())
            }
            HoneypotApiError::MalformedBody(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationFailed,
                format!("Malformed request body: {}", reason),
            ),
        };

        if status == StatusCode::BAD_REQUEST {
            tracing::debug!(code = %code, message = %message, "Rejected request");
        }

        let body = ErrorResponse::new(code.to_string(), message);
        (status, Json(body)).into_response()
    }
}
