//! Zip archive sink
//!
//! One long-lived `ZipWriter` is opened per run and every page becomes a
//! Deflate-compressed entry named after its URL. An existing archive at the
//! output path is appended to rather than replaced.

use crate::output::traits::{ContentSink, SinkError, SinkResult};
use crate::url::{to_file_name, HTML_SUFFIX};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes pages into a zip archive as they arrive
///
/// If the sink is dropped without `finish`, the writer's own drop still writes
/// the central directory so the archive stays readable.
pub struct ArchiveSink {
    path: PathBuf,
    writer: Option<ZipWriter<File>>,
    names: HashSet<String>,
}

impl ArchiveSink {
    /// Opens the archive at `path`, creating parent directories as needed
    ///
    /// # Returns
    ///
    /// * `Ok(ArchiveSink)` - Archive ready for writing
    /// * `Err(SinkError)` - The file could not be created, or an existing file
    ///   is not a valid zip archive
    pub fn create(path: &Path) -> SinkResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let existing = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
        let writer = if existing {
            tracing::info!("Appending to existing archive {}", path.display());
            let file = OpenOptions::new().read(true).write(true).open(path)?;
            ZipWriter::new_append(file)?
        } else {
            ZipWriter::new(File::create(path)?)
        };

        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(writer),
            names: HashSet::new(),
        })
    }
}

impl ContentSink for ArchiveSink {
    fn write_page(&mut self, url: &str, content: &str) -> SinkResult<()> {
        let writer = self.writer.as_mut().ok_or(SinkError::Finished)?;

        let name = to_file_name(url, HTML_SUFFIX);
        if !self.names.insert(name.clone()) {
            tracing::warn!(
                "Archive entry {} already written this run; {} replaces it",
                name,
                url
            );
        }

        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(name, options)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    fn finish(&mut self) -> SinkResult<PathBuf> {
        let mut writer = self.writer.take().ok_or(SinkError::Finished)?;
        let mut file = writer.finish()?;
        file.flush()?;
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn read_entry(path: &Path, name: &str) -> String {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_writes_named_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.zip");

        let mut sink = ArchiveSink::create(&path).unwrap();
        sink.write_page("https://a.com/x/y.html", "<html>y</html>")
            .unwrap();
        sink.write_page("https://a.com/z.html", "<html>z</html>")
            .unwrap();
        assert_eq!(sink.finish().unwrap(), path);

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(
            read_entry(&path, "https_a_com_x_y_html.html"),
            "<html>y</html>"
        );
    }

    #[test]
    fn test_colliding_names_last_writer_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.zip");

        let mut sink = ArchiveSink::create(&path).unwrap();
        sink.write_page("https://a.com/x.y", "first").unwrap();
        sink.write_page("https://a.com/x/y", "second").unwrap();
        sink.finish().unwrap();

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(read_entry(&path, "https_a_com_x_y.html"), "second");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("out.zip");

        let mut sink = ArchiveSink::create(&path).unwrap();
        sink.write_page("https://a.com/index.html", "x").unwrap();
        sink.finish().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_appends_to_existing_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.zip");

        let mut first = ArchiveSink::create(&path).unwrap();
        first.write_page("https://a.com/one.html", "1").unwrap();
        first.finish().unwrap();

        let mut second = ArchiveSink::create(&path).unwrap();
        second.write_page("https://a.com/two.html", "2").unwrap();
        second.finish().unwrap();

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(read_entry(&path, "https_a_com_one_html.html"), "1");
        assert_eq!(read_entry(&path, "https_a_com_two_html.html"), "2");
    }

    #[test]
    fn test_write_after_finish_fails() {
        let dir = tempdir().unwrap();
        let mut sink = ArchiveSink::create(&dir.path().join("out.zip")).unwrap();
        sink.finish().unwrap();

        assert!(matches!(
            sink.write_page("https://a.com/late.html", "x"),
            Err(SinkError::Finished)
        ));
        assert!(matches!(sink.finish(), Err(SinkError::Finished)));
    }

    #[test]
    fn test_dropped_sink_leaves_valid_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.zip");

        {
            let mut sink = ArchiveSink::create(&path).unwrap();
            sink.write_page("https://a.com/partial.html", "partial")
                .unwrap();
        }

        assert_eq!(read_entry(&path, "https_a_com_partial_html.html"), "partial");
    }

    #[test]
    fn test_existing_non_zip_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.zip");
        fs::write(&path, b"definitely not a zip").unwrap();

        assert!(matches!(
            ArchiveSink::create(&path),
            Err(SinkError::Zip(_))
        ));
    }
}
