//! Content sink trait and errors
//!
//! A content sink receives every successfully fetched page exactly once and
//! persists it. Sinks are driven by a single writer (the coordinator), so
//! implementations need `Send` but no internal locking.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting crawled content
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sink already finished")]
    Finished,
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Trait for content sinks
pub trait ContentSink: Send {
    /// Persists the content of one page
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL
    /// * `content` - The serialized page
    fn write_page(&mut self, url: &str, content: &str) -> SinkResult<()>;

    /// Flushes and closes the output
    ///
    /// Must be called once at the end of a run, including runs that stop early.
    /// Any later `write_page` fails with `SinkError::Finished`.
    ///
    /// # Returns
    ///
    /// The path of the written output file
    fn finish(&mut self) -> SinkResult<PathBuf>;
}
