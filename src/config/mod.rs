//! Configuration module for Tinytrip
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags are layered on top of it by the
//! binary.
//!
//! # Example
//!
//! ```no_run
//! use tinytrip::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tinytrip.toml")).unwrap();
//! println!("Fetching with {} workers", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, EmptyWhitelist, FilterConfig, OutputConfig, OutputMode,
    DEFAULT_ARCHIVE_PATH, DEFAULT_FILE_TYPES,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_CONCURRENCY};
