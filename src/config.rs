use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::clients::flickr::FLICKR_REST_API;

pub const API_KEY_ENV: &str = "FLICKR_API_KEY";
pub const API_SECRET_ENV: &str = "FLICKR_API_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub flickr: FlickrConfig,

    pub server: ServerConfig,

    pub client: ClientConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,

    /// Wipe the search history every time the server starts.
    pub reset_history_on_startup: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/photoscroll.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
            reset_history_on_startup: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickrConfig {
    pub base_url: String,

    /// Overridden by `FLICKR_API_KEY` when set.
    pub api_key: String,

    /// Overridden by `FLICKR_API_SECRET` when set.
    pub api_secret: String,

    pub per_page: u32,

    /// Per-attempt timeout in seconds (default: 4)
    pub request_timeout_seconds: u64,

    /// Upper bound for one search including retries and backoff (default: 9).
    /// Must stay below `client.request_timeout_seconds`.
    pub total_timeout_seconds: u64,

    /// Extra attempts after a transport failure. HTTP and payload errors are
    /// never retried.
    pub max_retries: u32,

    pub retry_base_delay_ms: u64,

    pub retry_max_delay_ms: u64,

    pub retry_jitter_ms: u64,
}

impl std::fmt::Debug for FlickrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlickrConfig")
            .field("base_url", &self.base_url)
            .field("api_key_set", &!self.api_key.is_empty())
            .field("api_secret_set", &!self.api_secret.is_empty())
            .field("per_page", &self.per_page)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("total_timeout_seconds", &self.total_timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            base_url: FLICKR_REST_API.to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            per_page: 20,
            request_timeout_seconds: 4,
            total_timeout_seconds: 9,
            max_retries: 2,
            retry_base_delay_ms: 250,
            retry_max_delay_ms: 2000,
            retry_jitter_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub bind_address: String,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "0.0.0.0".to_string(),
            cors_allowed_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
        }
    }
}

/// Settings for the gallery fetch loop (`browse` command).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,

    /// Absolute per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,

    /// Distance from the bottom, in pixels, that counts as "near the bottom".
    pub scroll_threshold_px: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_seconds: 10,
            scroll_threshold_px: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub json_logs: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "photoscroll".to_string());

        Self {
            metrics_enabled: true,
            json_logs: false,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

impl Config {
    /// Loads `.env`, the first config file found, then applies environment
    /// overrides for the Flickr credentials.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.flickr.api_key = key;
        }
        if let Some(secret) = lookup(API_SECRET_ENV).filter(|v| !v.trim().is_empty()) {
            self.flickr.api_secret = secret;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("photoscroll").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".photoscroll").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    /// Checks settings needed to serve searches. Missing credentials fail here
    /// instead of on every request.
    pub fn validate(&self) -> Result<()> {
        if self.flickr.api_key.trim().is_empty() || self.flickr.api_secret.trim().is_empty() {
            anyhow::bail!(
                "Flickr API key or secret is missing. Set {API_KEY_ENV} and {API_SECRET_ENV} or the [flickr] section of config.toml"
            );
        }

        if self.flickr.per_page == 0 {
            anyhow::bail!("flickr.per_page must be > 0");
        }

        if self.flickr.request_timeout_seconds == 0 {
            anyhow::bail!("flickr.request_timeout_seconds must be > 0");
        }

        if self.flickr.request_timeout_seconds > self.flickr.total_timeout_seconds {
            anyhow::bail!(
                "flickr.request_timeout_seconds ({}) must not exceed flickr.total_timeout_seconds ({})",
                self.flickr.request_timeout_seconds,
                self.flickr.total_timeout_seconds
            );
        }

        if self.flickr.total_timeout_seconds >= self.client.request_timeout_seconds {
            anyhow::bail!(
                "flickr.total_timeout_seconds ({}) must be below client.request_timeout_seconds ({})",
                self.flickr.total_timeout_seconds,
                self.client.request_timeout_seconds
            );
        }

        if self.server.port == 0 {
            anyhow::bail!("server.port must be > 0");
        }

        Ok(())
    }

    /// Client-side checks only; the `browse` command never talks to Flickr.
    pub fn validate_client(&self) -> Result<()> {
        url::Url::parse(&self.client.server_url)
            .with_context(|| format!("Invalid client.server_url: {}", self.client.server_url))?;

        if self.client.request_timeout_seconds == 0 {
            anyhow::bail!("client.request_timeout_seconds must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials() -> Config {
        let mut config = Config::default();
        config.flickr.api_key = "key".to_string();
        config.flickr.api_secret = "secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.client.request_timeout_seconds, 10);
        assert_eq!(config.flickr.base_url, FLICKR_REST_API);
        assert_eq!(config.flickr.per_page, 20);
        assert!(!config.general.reset_history_on_startup);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[flickr]"));
        assert!(toml_str.contains("[client]"));
        assert!(toml_str.contains("total_timeout_seconds"));
        assert!(!toml_str.contains("suppress_connection_errors"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [flickr]
            per_page = 50
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.flickr.per_page, 50);

        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn missing_credentials_fail_validation() {
        assert!(Config::default().validate().is_err());

        let mut config = with_credentials();
        config.flickr.api_secret = "  ".to_string();
        assert!(config.validate().is_err());

        assert!(with_credentials().validate().is_ok());
    }

    #[test]
    fn provider_budget_must_fit_client_deadline() {
        let config = with_credentials();
        assert!(config.flickr.total_timeout_seconds < config.client.request_timeout_seconds);

        let mut config = with_credentials();
        config.flickr.total_timeout_seconds = 25;
        assert!(config.validate().is_err());

        let mut config = with_credentials();
        config.flickr.total_timeout_seconds = config.client.request_timeout_seconds;
        assert!(config.validate().is_err());

        let mut config = with_credentials();
        config.flickr.request_timeout_seconds = 8;
        config.flickr.total_timeout_seconds = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_credentials() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| match key {
            API_KEY_ENV => Some("env-key".to_string()),
            API_SECRET_ENV => Some("env-secret".to_string()),
            _ => None,
        });
        assert_eq!(config.flickr.api_key, "env-key");
        assert_eq!(config.flickr.api_secret, "env-secret");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = with_credentials();
        config.apply_env_overrides(|_| Some(String::new()));
        assert_eq!(config.flickr.api_key, "key");
    }

    #[test]
    fn debug_output_hides_credentials() {
        let rendered = format!("{:?}", with_credentials().flickr);
        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("api_key_set: true"));
    }

    #[test]
    fn client_validation_checks_url() {
        let mut config = Config::default();
        assert!(config.validate_client().is_ok());
        config.client.server_url = "not a url".to_string();
        assert!(config.validate_client().is_err());
    }
}
