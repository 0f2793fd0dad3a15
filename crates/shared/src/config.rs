//! Configuration management for the scraping proxy.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream site settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Fetch pipeline settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Identifier table bounds
    #[serde(default)]
    pub id_table: IdTableConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Upstream site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the scraped site, without trailing slash
    pub base_url: String,

    /// Browser-like User-Agent sent with every request
    pub user_agent: String,

    /// Referer header; the base URL is used when unset
    #[serde(default)]
    pub referer: Option<String>,

    /// Per-request timeout applied to every upstream call
    pub timeout_seconds: u64,
}

/// How an episode page URL maps to its video-source JSON endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoUrlRule {
    /// Request the episode URL as-is
    #[default]
    Verbatim,
    /// Swap the `/animes/` segment for `/video/` and add the subtitle flag
    VideoPath,
}

/// Fetch pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Maximum concurrent listing page fetches
    pub listing_workers: usize,

    /// Maximum concurrent video-source fetches during enrichment
    pub enrich_workers: usize,

    /// Number of leading episodes to enrich (None = all)
    #[serde(default)]
    pub enrich_limit: Option<usize>,

    /// Listing pages fetched when the caller does not say
    pub default_pages: u32,

    /// Upper bound for caller-requested listing pages
    pub max_pages: u32,

    /// Episode URL to video endpoint rule
    #[serde(default)]
    pub video_url_rule: VideoUrlRule,
}

/// Identifier table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTableConfig {
    /// Maximum number of identifiers kept; oldest are evicted first
    pub capacity: usize,

    /// Entry lifetime in seconds (None = kept until evicted by capacity)
    #[serde(default)]
    pub ttl_seconds: Option<u64>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind
    pub listen_addr: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root_dir: "data".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://animefire.plus".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
            referer: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listing_workers: 5,
            enrich_workers: 3,
            enrich_limit: Some(3),
            default_pages: 1,
            max_pages: 10,
            video_url_rule: VideoUrlRule::Verbatim,
        }
    }
}

impl Default for IdTableConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            ttl_seconds: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            logging: LoggingConfig::default(),
            upstream: UpstreamConfig::default(),
            scraper: ScraperConfig::default(),
            id_table: IdTableConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl UpstreamConfig {
    /// Referer header value, falling back to the base URL
    pub fn referer(&self) -> &str {
        self.referer.as_deref().unwrap_or(&self.base_url)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }
}
