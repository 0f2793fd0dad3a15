//! Logging setup for the scraping proxy.
//!
//! Console output goes to stderr so the one-shot commands can keep stdout
//! for their JSON. An optional daily-rolling file under the log directory
//! records the same events, as plain text or JSON lines.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{Level, Subscriber};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Targets whose output is capped at `warn` regardless of the configured level
const NOISY_TARGETS: &[&str] = &["tower_http", "hyper", "reqwest", "h2", "html5ever", "selectors"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory receiving the rolling log files
    pub log_dir: PathBuf,
    /// Component name; also the log file prefix
    pub component: String,
    pub default_level: Level,
    /// Human-readable output on stderr
    pub console: bool,
    /// Rolling file output under `log_dir`
    pub file: bool,
    /// JSON lines instead of text in the log file
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("data/logs"),
            component: "anime-scraper".to_string(),
            default_level: Level::INFO,
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Logging settings for `component` taken from the `[logging]` section.
    pub fn from_config(config: &Config, component: &str) -> Self {
        Self {
            log_dir: config.log_dir(),
            component: component.to_string(),
            default_level: parse_level(&config.logging.default_level),
            console: config.logging.console,
            file: config.logging.file,
            json_format: config.logging.json_format,
        }
    }

    /// Env filter directive used when RUST_LOG is unset.
    pub fn filter_directive(&self) -> String {
        let level = self.default_level;
        let mut directives = vec![
            format!("{}={}", self.component.replace('-', "_"), level),
            format!("shared={}", level),
        ];
        directives.extend(NOISY_TARGETS.iter().map(|target| format!("{}=warn", target)));
        directives.join(",")
    }

    /// Name prefix of the rolling log files, e.g. `anime-scraper.log.2026-10-17`
    pub fn file_prefix(&self) -> String {
        format!("{}.log", self.component)
    }
}

/// Parse a textual level from the config file, defaulting to INFO.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn console_layer<S>(config: &LogConfig) -> Option<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    config.console.then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    })
}

/// File layer writing to `<log_dir>/<component>.log.<date>`; creates the
/// directory on first use.
fn file_layer<S>(config: &LogConfig) -> Result<Option<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if !config.file {
        return Ok(None);
    }

    let log_dir: &Path = &config.log_dir;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, config.file_prefix());

    let layer = if config.json_format {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(appender)
            .boxed()
    } else {
        fmt::layer().with_ansi(false).with_writer(appender).boxed()
    };

    Ok(Some(layer))
}

/// Install the global subscriber. RUST_LOG, when set, replaces the
/// configured levels.
pub fn init(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    tracing_subscriber::registry()
        .with(console_layer(&config))
        .with(file_layer(&config)?)
        .with(env_filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        component = %config.component,
        log_dir = %config.log_dir.display(),
        file = config.file,
        "Logging initialized"
    );

    Ok(())
}
