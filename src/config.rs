//! TOML configuration shared by the `server` and `lookup` binaries.
//!
//! Every section and field has a default, so an empty file is a valid config.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;
use crate::resolver::AggregationPolicy;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub aggregation: AggregationPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/2018_01_Sites_mobiles_2G_3G_4G_France_metropolitaine_L93.csv"),
            aggregation: AggregationPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: "https://api-adresse.data.gouv.fr/search/".to_string(),
            timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

impl GeocoderConfig {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.url).map_err(|source| ConfigError::GeocoderUrl {
            url: self.url.clone(),
            source,
        })
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.geocoder.base_url()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8000");
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(config.dataset.aggregation, AggregationPolicy::LastWins);
        assert_eq!(config.geocoder.max_attempts, 3);
        assert_eq!(config.geocoder.timeout_secs, 10);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [dataset]
            path = "/srv/sites.csv.gz"
            aggregation = "any"

            [geocoder]
            max_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("/srv/sites.csv.gz"));
        assert_eq!(config.dataset.aggregation, AggregationPolicy::Any);
        assert_eq!(config.geocoder.max_attempts, 5);
        assert_eq!(config.geocoder.url, "https://api-adresse.data.gouv.fr/search/");
    }

    #[test]
    fn test_rejects_bad_geocoder_url() {
        let err = Config::from_toml("[geocoder]\nurl = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::GeocoderUrl { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_from_file("/nonexistent/netcover.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
