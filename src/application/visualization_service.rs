// Visualization use case - fetch, decode, transform, render
use crate::application::indicator_source::{FetchError, IndicatorSource};
use crate::domain::figure::RenderedImage;
use crate::domain::indicator::IndicatorRequest;
use crate::domain::series::{IndicatorSeries, ShapeError};
use crate::domain::spectrum::Spectrum;
use crate::infrastructure::chart_renderer::{ChartRenderer, RenderError};

#[derive(Debug, thiserror::Error)]
pub enum VisualizeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone)]
pub struct VisualizationService {
    renderer: ChartRenderer,
}

impl VisualizationService {
    pub fn new(renderer: ChartRenderer) -> Self {
        Self { renderer }
    }

    pub async fn visualize(
        &self,
        source: &dyn IndicatorSource,
        request: &IndicatorRequest,
    ) -> Result<RenderedImage, VisualizeError> {
        let fetched = source.fetch(request).await?;

        let series = IndicatorSeries::from_document(&fetched.document)?;
        let spectrum = Spectrum::of(&series.values());
        tracing::debug!("Rendering {} samples for indicator {}", series.len(), request.id());

        // Rasterising is CPU bound; keep it off the async workers.
        let renderer = self.renderer.clone();
        let title = fetched.title;
        let image = tokio::task::spawn_blocking(move || renderer.render(&title, &series, &spectrum))
            .await
            .map_err(|e| RenderError::Worker(e.to_string()))??;

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::indicator_source::FetchedIndicator;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        outcome: Result<Value, FetchError>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(outcome: Result<Value, FetchError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IndicatorSource for StubSource {
        async fn fetch(&self, request: &IndicatorRequest) -> Result<FetchedIndicator, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map(|document| FetchedIndicator {
                document,
                title: request.title(),
            })
        }
    }

    fn request() -> IndicatorRequest {
        IndicatorRequest::new(
            1923,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
        )
        .unwrap()
    }

    fn service() -> VisualizationService {
        VisualizationService::new(ChartRenderer::new(320, 240))
    }

    #[tokio::test]
    async fn test_upstream_failure_short_circuits() {
        let source = StubSource::new(Err(FetchError::Status {
            status: 404,
            reason: "Not Found".to_string(),
        }));

        let err = service().visualize(&source, &request()).await.unwrap_err();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        match err {
            VisualizeError::Fetch(fetch) => assert_eq!(fetch.to_string(), "Not Found"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_document_is_shape_error() {
        let source = StubSource::new(Ok(json!({"indicator": {}})));

        let err = service().visualize(&source, &request()).await.unwrap_err();

        assert!(matches!(err, VisualizeError::Shape(ShapeError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_renders_png_for_two_points() {
        let source = StubSource::new(Ok(json!({
            "indicator": {"values": [
                {"datetime": "2020-01-01T00:00", "value": 10},
                {"datetime": "2020-01-01T01:00", "value": 20}
            ]}
        })));

        let image = service().visualize(&source, &request()).await.unwrap();

        assert_eq!(image.dimensions(), (320, 240));
        assert_eq!(&image.into_bytes()[..8], b"\x89PNG\r\n\x1a\n");
    }
}
