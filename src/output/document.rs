//! JSON document sink
//!
//! Pages are held in memory and written once, as a single JSON object mapping
//! URL to page content, when the sink is finished.

use crate::output::traits::{ContentSink, SinkError, SinkResult};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Collects pages and writes them as one JSON document at the end of the run
#[derive(Debug)]
pub struct DocumentSink {
    path: PathBuf,
    pages: BTreeMap<String, String>,
    finished: bool,
}

impl DocumentSink {
    /// Creates a sink that will write to `path` when finished
    ///
    /// Nothing touches the filesystem until `finish`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            pages: BTreeMap::new(),
            finished: false,
        }
    }
}

impl ContentSink for DocumentSink {
    fn write_page(&mut self, url: &str, content: &str) -> SinkResult<()> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        self.pages.insert(url.to_string(), content.to_string());
        Ok(())
    }

    fn finish(&mut self) -> SinkResult<PathBuf> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        self.finished = true;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.pages)?;
        writer.flush()?;

        tracing::debug!(
            "Wrote {} pages to {}",
            self.pages.len(),
            self.path.display()
        );
        Ok(self.path.clone())
    }
}
