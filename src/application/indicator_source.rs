// Source trait for indicator documents
use crate::domain::indicator::IndicatorRequest;
use async_trait::async_trait;
use serde_json::Value;

/// A successfully fetched indicator document plus the title describing it.
#[derive(Debug, Clone)]
pub struct FetchedIndicator {
    pub document: Value,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The provider answered with a non-success status.
    #[error("{reason}")]
    Status { status: u16, reason: String },
    #[error("indicator provider unreachable: {0}")]
    Transport(String),
    #[error("indicator provider returned an unreadable body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Fetch the raw document for one indicator request. Never retries.
    async fn fetch(&self, request: &IndicatorRequest) -> Result<FetchedIndicator, FetchError>;
}
