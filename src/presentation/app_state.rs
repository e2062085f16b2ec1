// Application state for HTTP handlers
use crate::application::visualization_service::VisualizationService;
use crate::infrastructure::config::EsiosSettings;

#[derive(Clone)]
pub struct AppState {
    /// Shared connection pool; fetchers built from it are per request.
    pub http: reqwest::Client,
    pub esios: EsiosSettings,
    pub visualization_service: VisualizationService,
}
