//! Shared library for the AnimeFire scraping proxy.
//!
//! This crate provides common functionality used by the scraper crate:
//! - Configuration management
//! - Data models and the JSON response envelope
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
