// HTTP response utilities for rendered charts
use crate::domain::figure::{PNG_CONTENT_TYPE, RenderedImage};
use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
};

/// Wrap an encoded chart as an `image/png` response with an explicit length.
pub fn png_response(image: RenderedImage) -> Result<Response<Body>, StatusCode> {
    let length = HeaderValue::from(image.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PNG_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, length)
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(image.into_bytes()))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
