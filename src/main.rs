// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::visualization_service::VisualizationService;
use crate::infrastructure::chart_renderer::ChartRenderer;
use crate::infrastructure::config::load_service_config;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_service_config()?;
    if !config.esios.has_api_key() {
        tracing::warn!(
            "No ESIOS API key configured; /indicators will answer 401 until ESIOS_VIZ__ESIOS__API_KEY is set"
        );
    }

    // Create services
    let renderer = ChartRenderer::new(config.render.width, config.render.height);
    let (width, height) = renderer.dimensions();
    let visualization_service = VisualizationService::new(renderer);

    let state = Arc::new(AppState {
        http: reqwest::Client::new(),
        esios: config.esios.clone(),
        visualization_service,
    });

    // Build router (presentation layer)
    let router = presentation::router(state);

    // Start server
    let addr = config.server.addr;
    tracing::info!(
        "Starting esios-demand-viz on {} (provider {}, charts {}x{})",
        addr,
        config.esios.base_url,
        width,
        height
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
