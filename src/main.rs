// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_store::DashboardStore;
use crate::application::durable_state::DurableState;
use crate::application::insight_service::InsightService;
use crate::domain::widget::known_widgets;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::file_state::FileDurableState;
use crate::infrastructure::gemini_client::GeminiInsightGenerator;
use crate::infrastructure::memory_state::MemoryDurableState;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;
    if config.gemini.api_key.is_empty() {
        tracing::warn!("No Gemini API key configured; analysis requests will fail");
    }

    // Durable state and store (infrastructure + application layers)
    let durable_state: Arc<dyn DurableState> = if config.storage.ephemeral {
        tracing::warn!("Ephemeral storage: dashboards will not survive a restart");
        Arc::new(MemoryDurableState::new())
    } else {
        Arc::new(FileDurableState::open(&config.storage.data_dir).await?)
    };
    let store = DashboardStore::load(durable_state).await;
    tracing::info!("Loaded {} dashboards", store.len());
    let store = Arc::new(Mutex::new(store));

    // Insight generator
    let generator = Arc::new(GeminiInsightGenerator::new(
        config.gemini.api_base,
        config.gemini.model,
        config.gemini.api_key,
        config.insights.prompt_template,
    ));
    let default_widgets = known_widgets(&config.widgets.defaults);
    if default_widgets.len() != config.widgets.defaults.len() {
        tracing::warn!("Ignoring unknown or repeated default widgets in configuration");
    }
    let insight_service = InsightService::new(
        generator,
        default_widgets,
        config.insights.max_input_bytes,
    );

    // Create application state
    let state = Arc::new(AppState::new(store, insight_service));

    // Build router (presentation layer)
    let router = build_router(state, config.insights.max_input_bytes + 64 * 1024);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting pm-status-brain on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
