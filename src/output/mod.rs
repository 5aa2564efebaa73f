//! Output module for persisting crawled pages and reporting progress
//!
//! This module handles:
//! - Persisting pages as a zip archive or a JSON document
//! - Recording run statistics
//! - Progress and summary lines on the terminal

mod archive;
mod document;
pub mod progress;
pub mod stats;
mod traits;

pub use archive::ArchiveSink;
pub use document::DocumentSink;
pub use progress::ProgressReporter;
pub use stats::RunStats;
pub use traits::{ContentSink, SinkError, SinkResult};

use crate::config::{OutputConfig, OutputMode, DEFAULT_ARCHIVE_PATH};
use crate::url::{to_file_name, JSON_SUFFIX};
use std::path::{Path, PathBuf};
use url::Url;

/// Resolves where the run writes its output
///
/// An explicit path always wins. Otherwise archive mode uses `data/out.zip`
/// and document mode derives `<seed-name>.json` from the seed URL.
///
/// # Examples
///
/// ```
/// use tinytrip::config::{OutputConfig, OutputMode};
/// use tinytrip::output::output_path;
/// use url::Url;
///
/// let seed = Url::parse("https://a.com/index.html").unwrap();
/// let config = OutputConfig { mode: OutputMode::Document, path: None };
/// assert_eq!(
///     output_path(&config, &seed).to_str(),
///     Some("https_a_com_index_html.json")
/// );
/// ```
pub fn output_path(config: &OutputConfig, seed: &Url) -> PathBuf {
    if let Some(path) = &config.path {
        return PathBuf::from(path);
    }

    match config.mode {
        OutputMode::Archive => PathBuf::from(DEFAULT_ARCHIVE_PATH),
        OutputMode::Document => PathBuf::from(to_file_name(seed.as_str(), JSON_SUFFIX)),
    }
}

/// Opens the sink for the given output mode
///
/// # Returns
///
/// * `Ok(Box<dyn ContentSink>)` - Sink ready to accept pages
/// * `Err(SinkError)` - The archive could not be opened
pub fn open_sink(mode: OutputMode, path: &Path) -> SinkResult<Box<dyn ContentSink>> {
    match mode {
        OutputMode::Archive => Ok(Box::new(ArchiveSink::create(path)?)),
        OutputMode::Document => Ok(Box::new(DocumentSink::new(path))),
    }
}
