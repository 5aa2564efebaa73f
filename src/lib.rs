//! Tinytrip: an easy to use text/html web scraper
//!
//! This crate implements a recursive web crawler that starts from a seed URL,
//! follows the links admitted by whitelist/blacklist/file-type patterns, fetches
//! every admitted page at most once, and persists the fetched content either as
//! a zip archive of HTML files or as a single JSON document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Tinytrip operations
///
/// Only conditions that abort a whole run live here. A page that cannot be
/// fetched or parsed is reported as a value and logged, never raised.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Failed to persist crawled content: {0}")]
    Sink(#[from] output::SinkError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Tinytrip operations
pub type Result<T> = std::result::Result<T, TripError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlReport};
pub use state::VisitState;
pub use url::{parse_seed, resolve, to_file_name, PatternFilter};
