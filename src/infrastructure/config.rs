use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub esios: EsiosSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct EsiosSettings {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for EsiosSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.esios.ree.es/".to_string(),
            api_key: None,
        }
    }
}

impl EsiosSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

// Hand-written so the credential never reaches the logs.
impl std::fmt::Debug for EsiosSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsiosSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Load `config/service.*` (optional) overlaid with `ESIOS_VIZ__*` environment variables.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/service").required(false))
        .add_source(config::Environment::with_prefix("ESIOS_VIZ").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> ServiceConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_apply_to_empty_file() {
        let config = parse("");

        assert_eq!(config.server.addr.port(), 8000);
        assert_eq!(config.esios.base_url, "https://api.esios.ree.es/");
        assert!(config.esios.api_key.is_none());
        assert_eq!((config.render.width, config.render.height), (640, 480));
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = parse(
            r#"
            [esios]
            api_key = "secret"

            [render]
            width = 800
            "#,
        );

        assert!(config.esios.has_api_key());
        assert_eq!(config.esios.base_url, "https://api.esios.ree.es/");
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, 480);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = parse("[esios]\napi_key = \"   \"\n");
        assert!(!config.esios.has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = parse("[esios]\napi_key = \"top-secret\"\n");
        let rendered = format!("{:?}", config.esios);

        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
