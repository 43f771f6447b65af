//! Scam honeypot HTTP server.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scam_honeypot::adapters::callback::HttpCallbackSink;
use scam_honeypot::adapters::http::{honeypot_router, ApiKeyState, HoneypotAppState};
use scam_honeypot::adapters::reply::{
    FallbackReplyEngine, HfConfig, HuggingFaceReplyEngine, RuleBasedReplyEngine,
};
use scam_honeypot::application::SessionStore;
use scam_honeypot::config::AppConfig;
use scam_honeypot::ports::ReplyEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        api_key = config.auth.is_enabled(),
        llm_replies = config.reply.has_huggingface(),
        callback = config.engagement.callback_url.is_some(),
        "Starting scam honeypot"
    );

    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Honeypot listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_reply_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn ReplyEngine>> {
    let rule_based: Arc<dyn ReplyEngine> = Arc::new(RuleBasedReplyEngine::new());

    let token = match &config.reply.hf_api_token {
        Some(token) if config.reply.has_huggingface() => token,
        _ => return Ok(rule_based),
    };

    let hf_config = HfConfig::new(token.expose_secret().as_str())
        .with_model(config.reply.hf_model.clone())
        .with_base_url(config.reply.hf_base_url.clone())
        .with_timeout(config.reply.timeout())
        .with_max_new_tokens(config.reply.max_new_tokens)
        .with_temperature(config.reply.temperature)
        .with_context_messages(config.reply.context_messages);
    let huggingface = HuggingFaceReplyEngine::new(hf_config)?;

    Ok(Arc::new(
        FallbackReplyEngine::new(Arc::new(huggingface)).with_fallback(rule_based),
    ))
}

fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let store = SessionStore::new(build_reply_engine(config)?, config.engagement.policy())
        .with_context_messages(config.reply.context_messages);

    let mut state = HoneypotAppState::new(Arc::new(store));
    if let Some(url) = &config.engagement.callback_url {
        let sink = HttpCallbackSink::new(url.clone(), config.engagement.callback_timeout())?;
        state = state.with_sink(Arc::new(sink));
    }

    let api_keys = ApiKeyState::new(config.auth.api_key.clone());

    Ok(honeypot_router(state, api_keys)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid)))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
