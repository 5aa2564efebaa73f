//! Tinytrip main entry point
//!
//! This is the command-line interface for the Tinytrip web scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tinytrip::config::{load_config_with_hash, validate, Config, EmptyWhitelist, OutputMode};
use tinytrip::crawler::crawl;
use tinytrip::output::ProgressReporter;
use tracing_subscriber::EnvFilter;

/// Exit code when the crawl finished but some pages could not be fetched
const EXIT_PAGE_FAILURES: u8 = 2;

/// Tinytrip: an easy to use text/html web scraper
///
/// Tinytrip starts at a URL, follows every link admitted by the whitelist,
/// blacklist and file-type patterns, fetches each page once, and stores the
/// pages in a zip archive or a single JSON document.
#[derive(Parser, Debug)]
#[command(name = "tinytrip")]
#[command(version)]
#[command(about = "An easy to use text/html web scraper", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Regex patterns of which at least one must appear in a URL
    #[arg(short, long, num_args = 1.., value_name = "PATTERN")]
    whitelist: Option<Vec<String>>,

    /// Regex patterns of which none may appear in a URL
    #[arg(short, long, num_args = 1.., value_name = "PATTERN")]
    blacklist: Option<Vec<String>>,

    /// Regex patterns for acceptable file types [default: html?$]
    #[arg(short = 'f', long, num_args = 1.., value_name = "PATTERN")]
    file_types: Option<Vec<String>>,

    /// Output file [default: data/out.zip, or <seed>.json in document mode]
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// How fetched pages are stored
    #[arg(short, long, value_enum)]
    mode: Option<OutputMode>,

    /// What an empty whitelist admits
    #[arg(long, value_enum)]
    empty_whitelist: Option<EmptyWhitelist>,

    /// Maximum number of fetches in flight
    #[arg(short, long)]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Maximum number of link hops from the start URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Exit with status 2 if any page failed to fetch
    #[arg(long)]
    fail_on_errors: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress and non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line flags on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(whitelist) = &self.whitelist {
            config.filter.whitelist = whitelist.clone();
        }
        if let Some(blacklist) = &self.blacklist {
            config.filter.blacklist = blacklist.clone();
        }
        if let Some(file_types) = &self.file_types {
            config.filter.file_types = file_types.clone();
        }
        if let Some(empty_whitelist) = self.empty_whitelist {
            config.filter.empty_whitelist = empty_whitelist;
        }
        if let Some(out) = &self.out {
            config.output.path = Some(out.to_string_lossy().into_owned());
        }
        if let Some(mode) = self.mode {
            config.output.mode = mode;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.timeout_secs = timeout;
        }
        if self.max_depth.is_some() {
            config.crawler.max_depth = self.max_depth;
        }
        if self.max_pages.is_some() {
            config.crawler.max_pages = self.max_pages;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they do not break the progress line on stdout.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tinytrip=info,warn"),
            1 => EnvFilter::new("tinytrip=debug,info"),
            2 => EnvFilter::new("tinytrip=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration, runs the crawl and maps the outcome to an exit code
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("invalid options")?;

    let progress = ProgressReporter::new(!cli.quiet);
    let report = crawl(&cli.url, &config, progress)
        .await
        .with_context(|| format!("crawl of {} failed", cli.url))?;

    if report.interrupted {
        tracing::warn!(
            "Crawl stopped early; {} contains the pages fetched so far",
            report.output.display()
        );
    }

    if cli.fail_on_errors && report.has_failures() {
        tracing::warn!("{} pages could not be fetched", report.failures);
        for url in &report.failed {
            tracing::warn!("  {}", url);
        }
        return Ok(ExitCode::from(EXIT_PAGE_FAILURES));
    }

    Ok(ExitCode::SUCCESS)
}
