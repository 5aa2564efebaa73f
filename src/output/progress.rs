//! Terminal progress reporting
//!
//! A single status line is rewritten in place (carriage return, no newline)
//! after every page, followed by one summary line at the end of the run.

use crate::output::stats::RunStats;
use std::io::{self, Write};
use std::time::Duration;

/// Width the current URL is padded to in the status line
const URL_COLUMN_WIDTH: usize = 70;

/// Formats the in-place status line
pub fn format_status(
    pages: u64,
    mib: f64,
    elapsed: Duration,
    url: &str,
    depth: u32,
) -> String {
    format!(
        "\rScraped {} pages ({:.2} MiB) in {:.2} secs. {:<width$} Depth: {}",
        pages,
        mib,
        elapsed.as_secs_f64(),
        url,
        depth,
        width = URL_COLUMN_WIDTH
    )
}

/// Formats the end-of-run summary line
pub fn format_summary(urls: usize, elapsed: Duration) -> String {
    format!("crawled {} urls in {:.2} secs.", urls, elapsed.as_secs_f64())
}

/// Writes progress to stdout unless disabled
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A reporter that prints nothing
    pub fn silent() -> Self {
        Self::new(false)
    }

    /// Starts the status line on a fresh row
    pub fn start(&self) {
        if self.enabled {
            println!();
        }
    }

    /// Rewrites the status line for the page just processed
    pub fn update(&self, stats: &RunStats, url: &str, depth: u32) {
        if !self.enabled {
            return;
        }
        let line = format_status(stats.pages(), stats.mib(), stats.elapsed(), url, depth);
        let mut stdout = io::stdout().lock();
        // Progress output is best effort; a closed stdout must not stop the crawl.
        let _ = stdout.write_all(line.as_bytes());
        let _ = stdout.flush();
    }

    /// Ends the status line and prints the summary
    pub fn finish(&self, urls: usize, elapsed: Duration) {
        if self.enabled {
            println!();
            println!("{}", format_summary(urls, elapsed));
        }
    }
}
