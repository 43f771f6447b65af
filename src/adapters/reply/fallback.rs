//! Fallback Reply Engine - wrapper that falls back to a secondary engine.
//!
//! When the primary engine fails for any reason the secondary engine is
//! asked instead. Typically the primary is the LLM-backed engine and the
//! secondary the rule-based persona, which never fails.
//!
//! # Example
//!
//! ```ignore
//! let engine = FallbackReplyEngine::new(Arc::new(HuggingFaceReplyEngine::new(config)?))
//!     .with_fallback(Arc::new(RuleBasedReplyEngine::new()));
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{ConversationContext, ReplyEngine, ReplyError};

/// Reply engine with an optional secondary.
pub struct FallbackReplyEngine {
    primary: Arc<dyn ReplyEngine>,
    fallback: Option<Arc<dyn ReplyEngine>>,
}

impl FallbackReplyEngine {
    pub fn new(primary: Arc<dyn ReplyEngine>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ReplyEngine>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

#[async_trait]
impl ReplyEngine for FallbackReplyEngine {
    async fn generate_reply(&self, context: &ConversationContext) -> Result<String, ReplyError> {
        match self.primary.generate_reply(context).await {
            Ok(reply) => Ok(reply),
            Err(error) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        session_id = %context.session_id,
                        trace_id = %context.trace_id,
                        primary = self.primary.engine_name(),
                        fallback = fallback.engine_name(),
                        error = %error,
                        "Primary reply engine failed, using fallback"
                    );
                    fallback.generate_reply(context).await
                }
                None => Err(error),
            },
        }
    }

    fn engine_name(&self) -> &'static str {
        self.primary.engine_name()
    }
}
