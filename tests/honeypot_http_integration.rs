//! Integration tests for the honeypot HTTP endpoints.
//!
//! These tests drive the full axum router with `tower::ServiceExt::oneshot`:
//! 1. Public and protected routes with and without an API key
//! 2. Request validation and the error envelope
//! 3. Final-output reports, both requested and emitted to a sink

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

use scam_honeypot::adapters::http::{honeypot_router, ApiKeyState, HoneypotAppState};
use scam_honeypot::adapters::reply::MockReplyEngine;
use scam_honeypot::application::SessionStore;
use scam_honeypot::domain::final_output::{EngagementPolicy, FinalOutput, OutputStatus};
use scam_honeypot::ports::{FinalOutputSink, ReplyError, SinkError};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Sink that keeps every report it receives.
#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<FinalOutput>>,
}

#[async_trait]
impl FinalOutputSink for RecordingSink {
    async fn submit(&self, output: &FinalOutput) -> Result<(), SinkError> {
        self.reports.lock().unwrap().push(output.clone());
        Ok(())
    }
}

impl RecordingSink {
    /// Waits for background deliveries to land.
    async fn wait_for(&self, count: usize) -> Vec<FinalOutput> {
        for _ in 0..100 {
            {
                let reports = self.reports.lock().unwrap();
                if reports.len() >= count {
                    return reports.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.reports.lock().unwrap().clone()
    }

    fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new(engine: MockReplyEngine) -> Self {
        Self::build(engine, EngagementPolicy::default(), None, None)
    }

    fn build(
        engine: MockReplyEngine,
        policy: EngagementPolicy,
        api_key: Option<&str>,
        sink: Option<Arc<RecordingSink>>,
    ) -> Self {
        let store = Arc::new(SessionStore::new(Arc::new(engine), policy));
        let mut state = HoneypotAppState::new(store);
        if let Some(sink) = sink {
            state = state.with_sink(sink);
        }
        let keys = ApiKeyState::new(api_key.map(|k| Secret::new(k.to_string())));
        Self {
            router: honeypot_router(state, keys),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(post_request(uri, body, None)).await
    }

    async fn message(&self, session_id: &str, text: &str) -> (StatusCode, Value) {
        self.post("/honeypot", message_body(session_id, text)).await
    }
}

fn post_request(uri: &str, body: Value, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn message_body(session_id: &str, text: &str) -> Value {
    json!({
        "sessionId": session_id,
        "message": {
            "sender": "scammer",
            "text": text,
            "timestamp": "2026-01-21T10:15:30Z"
        },
        "conversationHistory": [],
        "metadata": { "channel": "SMS", "language": "English", "locale": "IN" }
    })
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn root_returns_service_banner() {
    let app = TestApp::new(MockReplyEngine::new());
    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Honeypot API Running");
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn health_is_public_when_api_key_is_enforced() {
    let app = TestApp::build(MockReplyEngine::new(), EngagementPolicy::default(), Some("k"), None);
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

// =============================================================================
// POST /honeypot
// =============================================================================

#[tokio::test]
async fn honeypot_returns_persona_reply() {
    let app = TestApp::new(MockReplyEngine::new().with_response("Which branch are you calling from?"));
    let (status, body) = app
        .message("http-1", "Your account is blocked, send OTP to 9876543210 immediately")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "reply": "Which branch are you calling from?" }));
}

#[tokio::test]
async fn reply_engine_failure_still_returns_success() {
    let app = TestApp::new(MockReplyEngine::new().with_error(ReplyError::AuthenticationFailed));
    let (status, body) = app.message("http-2", "Send OTP now").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(!body["reply"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn api_key_is_required_when_configured() {
    let app = TestApp::build(MockReplyEngine::new(), EngagementPolicy::default(), Some("hp-key"), None);

    let (status, body) = app.message("http-3", "hello").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send(post_request("/honeypot", message_body("http-3", "hello"), Some("wrong")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(post_request("/honeypot", message_body("http-3", "hello"), Some("hp-key")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let app = TestApp::new(MockReplyEngine::new());
    let (status, body) = app.message("http-4", "   ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, _) = app.get("/session/http-4").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_scammer_sender_is_rejected() {
    let app = TestApp::new(MockReplyEngine::new());
    let body = json!({
        "sessionId": "http-5",
        "message": { "sender": "user", "text": "hello" }
    });
    let (status, body) = app.post("/honeypot", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("sender"));
}

#[tokio::test]
async fn malformed_body_uses_error_envelope() {
    let app = TestApp::new(MockReplyEngine::new());
    let (status, body) = app.post("/honeypot", json!({ "sessionId": "x" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn epoch_millis_timestamp_is_accepted() {
    let app = TestApp::new(MockReplyEngine::new());
    let body = json!({
        "sessionId": "http-6",
        "message": { "sender": "scammer", "text": "hello", "timestamp": 1_770_000_000_000i64 }
    });
    let (status, _) = app.post("/honeypot", body).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Reports and snapshots
// =============================================================================

#[tokio::test]
async fn final_output_for_unknown_session_is_not_found() {
    let app = TestApp::new(MockReplyEngine::new());
    let (status, body) = app.post("/final-output", json!({ "sessionId": "nobody" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn final_output_reports_accumulated_intelligence() {
    let app = TestApp::new(MockReplyEngine::new());
    app.message("e2e", "Your account is blocked, send OTP to 9876543210 immediately")
        .await;
    app.message("e2e", "Transfer to rahul@upi now or account will be suspended")
        .await;

    let (status, body) = app.post("/final-output", json!({ "sessionId": "e2e" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "e2e");
    assert_eq!(body["scamDetected"], true);
    assert_eq!(body["scamType"], "upi_fraud");
    assert_eq!(body["turnCount"], 2);
    assert_eq!(body["totalMessagesExchanged"], 4);
    assert_eq!(body["status"], "progressive");
    assert_eq!(body["isFinal"], false);
    assert_eq!(body["extractedIntelligence"]["phoneNumbers"], json!(["9876543210"]));
    assert_eq!(body["extractedIntelligence"]["upiIds"], json!(["rahul@upi"]));
    assert!(body["redFlags"].as_array().unwrap().contains(&json!("threatOfConsequence")));
    assert!(body["engagementDurationSeconds"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn session_snapshot_is_exposed() {
    let app = TestApp::new(MockReplyEngine::new());
    app.message("snap", "Click http://bit.ly/kyc-update to verify").await;

    let (status, body) = app.get("/session/snap").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "snap");
    assert_eq!(body["turnCount"], 1);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);

    let (status, _) = app.get("/session/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_are_delivered_to_sink_from_min_turn() {
    let sink = Arc::new(RecordingSink::default());
    let app = TestApp::build(
        MockReplyEngine::new(),
        EngagementPolicy::new(2, 3),
        None,
        Some(sink.clone()),
    );

    app.message("sink", "This is the fraud department, urgent").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(sink.count(), 0);

    app.message("sink", "Pay Rs 5,000 processing fee now").await;
    let reports = sink.wait_for(1).await;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].turn_count, 2);
    assert_eq!(reports[0].status, OutputStatus::Progressive);
    assert!(!reports[0].is_final);

    app.message("sink", "Last chance, pay immediately").await;
    let reports = sink.wait_for(2).await;
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1].status, OutputStatus::Terminal);
    assert!(reports[1].is_final);
}
