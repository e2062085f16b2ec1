// ESIOS (api.esios.ree.es) indicator source
use crate::application::indicator_source::{FetchError, FetchedIndicator, IndicatorSource};
use crate::domain::indicator::{IndicatorRequest, format_date};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

const INDICATOR_PATH: &str = "indicators/${id}?start_date=${start_date}&end_date=${end_date}";
const ESIOS_ACCEPT: &str = "application/json; application/vnd.esios-api-v1+json";
const API_KEY_HEADER: &str = "x-api-key";

/// Replace `${name}` placeholders in [`INDICATOR_PATH`]
fn indicator_path(vars: &[(&str, String)]) -> String {
    vars.iter().fold(INDICATOR_PATH.to_string(), |path, (key, value)| {
        path.replace(&format!("${{{key}}}"), value)
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Provide an API key. You can request your personal token at consultasios@ree.es")]
    MissingApiKey,
}

/// Request-scoped fetcher; cheap to build since the HTTP client is shared.
#[derive(Clone)]
pub struct EsiosFetcher {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for EsiosFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsiosFetcher")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl EsiosFetcher {
    /// Fails with [`ConfigurationError::MissingApiKey`] when the key is absent or blank.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigurationError::MissingApiKey)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn indicator_url(&self, request: &IndicatorRequest) -> String {
        let path = indicator_path(&[
            ("id", request.id().to_string()),
            ("start_date", format_date(request.start_date())),
            ("end_date", format_date(request.end_date())),
        ]);
        format!("{}/{}", self.base_url, path)
    }

    async fn get_document(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, ESIOS_ACCEPT)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            tracing::warn!("ESIOS request failed with status {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl IndicatorSource for EsiosFetcher {
    async fn fetch(&self, request: &IndicatorRequest) -> Result<FetchedIndicator, FetchError> {
        let url = self.indicator_url(request);
        tracing::debug!("Fetching indicator from {}", url);

        let document = self.get_document(&url).await?;
        Ok(FetchedIndicator {
            document,
            title: request.title(),
        })
    }
}
