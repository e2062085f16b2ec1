// HTTP request handlers
use crate::domain::indicator::{IndicatorQuery, IndicatorRequest, ValidationError};
use crate::infrastructure::esios_client::EsiosFetcher;
use crate::infrastructure::http_response::png_response;
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

const USAGE: &str = "To get visualization of Demanda Real use GET request to /indicators \
providing id: int, start_date: date, end_date: date. \
Example: api_uri:port/indicators?id=1923&start_date=2020-01-01&end_date=2020-01-10";

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Usage help for the visualization route
pub async fn index() -> Json<Value> {
    Json(json!({ "message": USAGE }))
}

/// Fetch one indicator and answer with its chart as PNG
pub async fn indicator_chart(
    query: Result<Query<IndicatorQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    // Parameters are checked before anything touches the network.
    let Query(query) =
        query.map_err(|rejection| ValidationError::unreadable_query(rejection.body_text()))?;
    let request = IndicatorRequest::from_query(&query)?;
    let fetcher = EsiosFetcher::new(
        state.http.clone(),
        &state.esios.base_url,
        state.esios.api_key.clone(),
    )?;

    let image = state
        .visualization_service
        .visualize(&fetcher, &request)
        .await?;

    let (width, height) = image.dimensions();
    tracing::info!(
        "Rendered indicator {} ({} to {}) as {}x{} PNG, {} bytes",
        request.id(),
        request.start_date(),
        request.end_date(),
        width,
        height,
        image.len()
    );

    Ok(match png_response(image) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}
