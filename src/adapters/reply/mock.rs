//! Mock Reply Engine for testing.
//!
//! Provides a configurable implementation of the ReplyEngine port so tests
//! can run without a language model.
//!
//! # Features
//!
//! - Queued replies and injected errors, consumed in order
//! - Simulated latency for concurrency tests
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let engine = MockReplyEngine::new()
//!     .with_response("Which bank are you from?")
//!     .with_delay(Duration::from_millis(50));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ConversationContext, ReplyEngine, ReplyError};

/// Mock reply engine.
///
/// Clones share the queue and call history, so a test can keep a clone as
/// a probe after handing the engine to a session store.
#[derive(Debug, Clone)]
pub struct MockReplyEngine {
    /// Queued outcomes (consumed in order).
    outcomes: Arc<Mutex<VecDeque<Result<String, ReplyError>>>>,
    /// Reply once the queue is empty.
    default_response: String,
    /// Simulated latency per call.
    delay: Duration,
    /// Contexts received, in call order.
    calls: Arc<Mutex<Vec<ConversationContext>>>,
}

impl Default for MockReplyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReplyEngine {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            default_response: "Mock reply".to_string(),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_response(self, reply: impl Into<String>) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(reply.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ReplyError) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sets the reply returned once the queue is exhausted.
    pub fn with_default_response(mut self, reply: impl Into<String>) -> Self {
        self.default_response = reply.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<ConversationContext> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyEngine for MockReplyEngine {
    async fn generate_reply(&self, context: &ConversationContext) -> Result<String, ReplyError> {
        self.calls.lock().unwrap().push(context.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()))
    }

    fn engine_name(&self) -> &'static str {
        "mock"
    }
}
