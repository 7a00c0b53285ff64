use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Desktop browser user agent sent with every upstream request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scraping and retry settings
    pub scraper: ScraperConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Caption language matched as a substring of the track's language code
    pub preferred_language: Option<String>,

    /// User agent for page and caption requests
    pub user_agent: String,

    /// Scheme and host of the watch page
    pub watch_base_url: String,

    /// Attempts per upstream request, including the first
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` failing waits `n` times this
    pub retry_delay_ms: u64,

    /// Per-request timeout, none by default
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP route listens on
    pub bind_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub filter: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            preferred_language: Some("pt".to_string()),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            watch_base_url: "https://www.youtube.com".to_string(),
            max_attempts: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "transcript_scraper=info".to_string(),
        }
    }
}

impl ScraperConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from the default location, falling back to built-in defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-scraper").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.scraper.max_attempts == 0 {
            anyhow::bail!("scraper.max_attempts must be at least 1");
        }

        if self.scraper.user_agent.trim().is_empty() {
            anyhow::bail!("scraper.user_agent must not be empty");
        }

        crate::utils::validate_and_normalize_url(&self.scraper.watch_base_url)
            .context("scraper.watch_base_url is invalid")?;

        self.bind_address()?;

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server
            .bind_address
            .parse()
            .with_context(|| format!("Invalid server.bind_address: {}", self.server.bind_address))
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!(
            "  Preferred Language: {}",
            self.scraper.preferred_language.as_deref().unwrap_or("(first track)")
        );
        println!("  Watch Base URL: {}", self.scraper.watch_base_url);
        println!("  Max Attempts: {}", self.scraper.max_attempts);
        println!("  Retry Delay: {}ms", self.scraper.retry_delay_ms);
        match self.scraper.request_timeout_secs {
            Some(secs) => println!("  Request Timeout: {}s", secs),
            None => println!("  Request Timeout: none"),
        }
        println!("  Bind Address: {}", self.server.bind_address);
        println!("  Log Filter: {}", self.logging.filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scraper.max_attempts, 3);
        assert_eq!(config.scraper.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.scraper.request_timeout(), None);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("scraper:\n  preferred_language: en\n  max_attempts: 5\n").unwrap();
        assert_eq!(config.scraper.preferred_language.as_deref(), Some("en"));
        assert_eq!(config.scraper.max_attempts, 5);
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_rejects_zero_attempts() {
        assert!(Config::from_yaml("scraper:\n  max_attempts: 0\n").is_err());
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        assert!(Config::from_yaml("server:\n  bind_address: not-an-address\n").is_err());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(Config::from_yaml("scraper:\n  watch_base_url: ftp://example.com\n").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.scraper.request_timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scraper.request_timeout_secs, Some(30));
        assert_eq!(loaded.logging.filter, config.logging.filter);
    }
}
