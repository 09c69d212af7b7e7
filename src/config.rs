use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("catalog").required(false));

        // Add environment variables with prefix "CATALOG_", e.g. CATALOG_CATALOG__TIMEOUT_SECS
        config = config.add_source(
            config::Environment::with_prefix("CATALOG")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the catalog base URL from config or environment
    pub fn base_url(&self) -> String {
        if let Some(base_url) = &self.catalog.base_url {
            return base_url.clone();
        }

        // Fall back to environment variable
        if let Ok(url) = std::env::var("CATALOG_BASE_URL") {
            return url;
        }

        // Default for local development
        "http://localhost:21000".to_string()
    }

    pub fn api_token(&self) -> Option<String> {
        self.catalog
            .api_token
            .clone()
            .or_else(|| std::env::var("CATALOG_API_TOKEN").ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn explicit_base_url_wins() {
        let config = AppConfig {
            catalog: CatalogConfig {
                base_url: Some("https://tenant.example.com".to_string()),
                ..CatalogConfig::default()
            },
        };
        assert_eq!(config.base_url(), "https://tenant.example.com");
    }
}
