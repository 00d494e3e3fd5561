//! Career persona HTTP server
//!
//! Axum server exposing the persona agent over a single JSON chat endpoint.
//! Provider, tools and persona are built once at startup and shared by every
//! request.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::AgentBuilder;
use agent_runtime::select_provider;
use career_persona::{Persona, build_notifier, persona_tools};

use crate::config::AppConfig;
use crate::handlers::{chat_handler, health_check};
use crate::state::AppState;

/// Build the router
pub fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Select the LLM provider; missing settings stop startup here
    let provider = select_provider(&config.provider).context("AI provider configuration")?;

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Provider reachable"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Provider not reachable yet - chat requests will fail until it is");
        }
    }

    // Initialize tools
    let notifier = build_notifier(&config.notify)?;
    if config.notify.topic.is_none() {
        tracing::warn!("⚠ NTFY_TOPIC not set - push notifications disabled");
    }
    let tools = persona_tools(&notifier);

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let persona = Persona::load(&config.persona_dir, config.persona_name.clone())
        .with_context(|| format!("loading persona from {}", config.persona_dir.display()))?;

    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(persona.system_prompt())
        .max_iterations(config.max_iterations)
        .build()?;

    let state = AppState {
        agent: Arc::new(agent),
    };

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 {} is answering on http://{}", persona.name, config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health - Health check");
    tracing::info!("  POST /chat   - Send message");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
