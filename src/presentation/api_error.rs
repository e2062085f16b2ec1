// Mapping of pipeline failures onto HTTP responses
use crate::application::indicator_source::FetchError;
use crate::application::visualization_service::VisualizeError;
use crate::domain::indicator::ValidationError;
use crate::infrastructure::esios_client::ConfigurationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Visualize(#[from] VisualizeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Visualize(VisualizeError::Fetch(FetchError::Status { .. })) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Visualize(VisualizeError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Visualize(VisualizeError::Shape(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Visualize(VisualizeError::Render(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Indicator visualization failed: {}", self);
        } else if let ApiError::Visualize(VisualizeError::Fetch(FetchError::Status {
            status: upstream,
            ..
        })) = &self
        {
            tracing::warn!("Upstream answered {}, returning {}: {}", upstream, status, self);
        } else {
            tracing::warn!("Indicator request rejected ({}): {}", status, self);
        }

        let body = match &self {
            ApiError::Validation(err) => json!({ "detail": err.errors }),
            other => json!({ "detail": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
