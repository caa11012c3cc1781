// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

use crate::application::chat_backend::ChatBackend;
use crate::application::chat_service::ChatService;
use crate::application::curation_service::CurationService;
use crate::application::data_context::DataContext;
use crate::application::fleet_service::FleetService;
use crate::application::keyword_chat::KeywordChatBackend;
use crate::application::streaming_service::LiveFeedService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::openai_backend::OpenAiChatBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_app_config()?;
    init_logging(&config.log);

    // Generate the synthetic datasets once; everything downstream reads them
    let context = Arc::new(
        DataContext::initialize(&config.data, Utc::now()).context("Failed to generate fleet data")?,
    );

    let backend: Arc<dyn ChatBackend> = match config.llm.api_key() {
        Some(key) => Arc::new(OpenAiChatBackend::new(&config.llm, key)?),
        None => Arc::new(KeywordChatBackend::new(context.clone())),
    };

    // Create services (application layer)
    let state = Arc::new(AppState {
        curation_service: CurationService::new(context.clone()),
        fleet_service: FleetService::new(context.clone()),
        chat_service: ChatService::new(backend, context),
        live_feed: LiveFeedService::new(config.live.clone()),
    });

    tracing::info!(backend = state.chat_service.backend_name(), "chat backend selected");

    let router = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Starting fleet-ops service");

    axum::serve(listener, router).await?;

    Ok(())
}
