// Infrastructure layer - External dependencies and adapters
pub mod chart_renderer;
pub mod config;
pub mod esios_client;
pub mod http_response;
