//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and anchor extraction
//! - The frontier stack and concurrency limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, CrawlReport, CrawlSession};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{parse_page, ParseError, ParsedPage};
pub use scheduler::{CrawlLimits, PendingUrl, ScheduledFetch, Scheduler};

use crate::config::Config;
use crate::output::{open_sink, output_path, ProgressReporter};
use crate::url::parse_seed;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the seed URL
/// 2. Compile the admission patterns
/// 3. Build the HTTP client
/// 4. Open the output sink
/// 5. Crawl until the frontier is exhausted or Ctrl-C is pressed
///
/// # Arguments
///
/// * `seed` - The URL to start from
/// * `config` - The crawler configuration
/// * `progress` - Terminal progress output
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (possibly interrupted)
/// * `Err(TripError)` - Crawl could not start, or its output could not be written
///
/// # Example
///
/// ```no_run
/// use tinytrip::config::Config;
/// use tinytrip::crawler::crawl;
/// use tinytrip::output::ProgressReporter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(
///     "https://example.com/index.html",
///     &Config::default(),
///     ProgressReporter::silent(),
/// )
/// .await?;
/// println!("{} pages", report.pages);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed: &str, config: &Config, progress: ProgressReporter) -> Result<CrawlReport> {
    let seed = parse_seed(seed)?;
    let session = CrawlSession::new(config)?;
    let fetcher = HttpFetcher::new(&config.crawler)?;

    let path = output_path(&config.output, &seed);
    tracing::info!(
        "Crawling {} ({:?} mode, output {})",
        seed,
        config.output.mode,
        path.display()
    );
    let sink = open_sink(config.output.mode, &path)?;

    Coordinator::new(seed, session, config, fetcher, sink)
        .with_progress(progress)
        .run()
        .await
}
