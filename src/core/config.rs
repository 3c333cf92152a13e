use crate::core::board::{BoardOptions, DEFAULT_REQUEST_TIMEOUT, DEFAULT_STAGGER_INTERVAL};
use crate::core::currency::{self, DEFAULT_CURRENCY};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const ACCESS_TOKEN_ENV: &str = "METALOTRACK_ACCESS_TOKEN";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoldApiProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub access_token: String,
}

impl Default for GoldApiProviderConfig {
    fn default() -> Self {
        GoldApiProviderConfig {
            base_url: "https://www.goldapi.io/api".to_string(),
            access_token: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub goldapi: GoldApiProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BoardConfig {
    #[serde(default = "default_stagger_interval_ms")]
    pub stagger_interval_ms: u64,
    /// Zero disables the per-request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_stagger_interval_ms() -> u64 {
    DEFAULT_STAGGER_INTERVAL.as_millis() as u64
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            stagger_interval_ms: default_stagger_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BoardConfig {
    pub fn options(&self) -> BoardOptions {
        BoardOptions {
            stagger_interval: Duration::from_millis(self.stagger_interval_ms),
            request_timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "metalotrack", "metalotrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if currency::find(&self.currency).is_none() {
            bail!("Unsupported currency in config: {}", self.currency);
        }
        Ok(())
    }

    /// The provider token, taken from the environment when set there.
    pub fn access_token(&self) -> Result<String> {
        let token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.providers.goldapi.access_token.clone());
        if token.trim().is_empty() {
            bail!(
                "No GoldAPI access token configured; set providers.goldapi.access_token or {}",
                ACCESS_TOKEN_ENV
            );
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "USD"
providers:
  goldapi:
    base_url: "http://example.com/api"
    access_token: "goldapi-test"
board:
  stagger_interval_ms: 250
  request_timeout_secs: 0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.providers.goldapi.base_url, "http://example.com/api");
        assert_eq!(config.providers.goldapi.access_token, "goldapi-test");

        let options = config.board.options();
        assert_eq!(options.stagger_interval, Duration::from_millis(250));
        assert!(options.request_timeout.is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.currency, "INR");
        assert_eq!(config.providers.goldapi.base_url, "https://www.goldapi.io/api");
        assert!(config.providers.goldapi.access_token.is_empty());
        assert_eq!(config.board.options(), BoardOptions::default());
    }

    #[test]
    fn test_unknown_currency_is_rejected() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "currency: \"XYZ\"\n")?;

        let result = AppConfig::load_from_path(&path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported currency in config: XYZ")
        );
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_path("/nonexistent/metalotrack/config.yaml");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
