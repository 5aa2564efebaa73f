//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Claiming URLs from the frontier and spawning fetch tasks
//! - Persisting fetched pages through the content sink
//! - Resolving, filtering and scheduling discovered links
//! - Handling interrupts (stop scheduling, drain, finish the sink)
//! - Building the final run report

use crate::config::{Config, OutputMode};
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::parser::parse_page;
use crate::crawler::scheduler::{CrawlLimits, PendingUrl, ScheduledFetch, Scheduler};
use crate::output::{ContentSink, ProgressReporter, RunStats, SinkError};
use crate::state::{VisitState, VisitedRegistry};
use crate::url::{resolve, PatternFilter};
use crate::{ConfigError, TripError};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::{Id, JoinError, JoinSet};
use url::Url;

/// Per-run crawl state
///
/// Created once per run and dropped with it; nothing here is process-wide, so
/// independent crawls can run side by side in one process.
#[derive(Debug)]
pub struct CrawlSession {
    /// Which URLs have been claimed and how they ended
    pub registry: VisitedRegistry,

    /// Page, byte and failure counters
    pub stats: RunStats,

    /// Admission patterns for discovered links
    pub filter: PatternFilter,

    /// Depth and page limits
    pub limits: CrawlLimits,
}

impl CrawlSession {
    /// Creates a fresh session, compiling the filter patterns
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            registry: VisitedRegistry::new(),
            stats: RunStats::new(),
            filter: PatternFilter::from_config(&config.filter)?,
            limits: CrawlLimits::from(&config.crawler),
        })
    }
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Successfully fetched URLs, sorted lexicographically
    pub urls: Vec<String>,

    /// URLs that could not be fetched, sorted lexicographically
    pub failed: Vec<String>,

    /// Number of pages persisted
    pub pages: u64,

    /// Total size of the persisted content
    pub bytes: u64,

    /// Number of URLs that could not be fetched
    pub failures: u64,

    /// Wall time of the run
    pub elapsed: Duration,

    /// True if the run was stopped before the frontier was exhausted
    pub interrupted: bool,

    /// Where the content was written
    pub output: PathBuf,
}

impl CrawlReport {
    /// Returns true if at least one URL failed to fetch
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }
}

/// What a fetch task produced
#[derive(Debug)]
enum TaskOutcome {
    /// Content to persist, plus the raw hrefs found in it
    Fetched {
        final_url: Url,
        document: String,
        hrefs: Vec<Option<String>>,
    },

    /// The URL is a dead end
    Failed { reason: String },
}

/// A finished fetch task
///
/// The permit travels with the result so the fetch slot is only released once
/// the coordinator has handled the page.
#[derive(Debug)]
struct PageTask {
    pending: PendingUrl,
    outcome: TaskOutcome,
    elapsed: Duration,
    _permit: OwnedSemaphorePermit,
}

/// Main crawler coordinator structure
///
/// The coordinator is the only writer to the sink and the registry; fetch
/// tasks only fetch and parse.
pub struct Coordinator<F: PageFetcher> {
    seed: Url,
    fetcher: Arc<F>,
    session: CrawlSession,
    scheduler: Scheduler,
    sink: Box<dyn ContentSink>,
    progress: ProgressReporter,
    /// Log every completed page at info level instead of debug
    verbose_pages: bool,
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `seed` - The URL the crawl starts from; it is not filtered
    /// * `session` - Fresh per-run state
    /// * `config` - The crawler configuration
    /// * `fetcher` - Source of page content
    /// * `sink` - Where fetched pages are persisted
    pub fn new(
        seed: Url,
        session: CrawlSession,
        config: &Config,
        fetcher: F,
        sink: Box<dyn ContentSink>,
    ) -> Self {
        let scheduler = Scheduler::new(config.crawler.concurrency as usize, session.limits);

        Self {
            seed,
            fetcher: Arc::new(fetcher),
            session,
            scheduler,
            sink,
            progress: ProgressReporter::silent(),
            verbose_pages: config.output.mode == OutputMode::Document,
        }
    }

    /// Sets the terminal progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Runs the crawl until the frontier is exhausted or Ctrl-C is pressed
    pub async fn run(self) -> Result<CrawlReport, TripError> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_until(shutdown).await
    }

    /// Runs the crawl until the frontier is exhausted or `shutdown` completes
    ///
    /// This is the core crawling logic that:
    /// 1. Claims URLs from the scheduler while fetch slots are free
    /// 2. Spawns a fetch+parse task for each claimed URL
    /// 3. Handles finished tasks one at a time: persist, record, schedule children
    /// 4. On shutdown, stops claiming and drains the tasks already in flight
    /// 5. Finishes the sink and builds the report
    ///
    /// A persistence failure aborts the run after the sink has been given a
    /// chance to finish.
    pub async fn run_until<S>(mut self, shutdown: S) -> Result<CrawlReport, TripError>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!("Starting crawl at {}", self.seed);
        self.progress.start();
        self.scheduler.seed(self.seed.clone());

        let mut tasks: JoinSet<PageTask> = JoinSet::new();
        // URL of every running task, so a task that panics can still be recorded
        let mut in_flight: HashMap<Id, PendingUrl> = HashMap::new();
        let mut interrupted = false;

        loop {
            if !interrupted {
                while let Some(fetch) = self.scheduler.next_url(&self.session.registry) {
                    self.spawn_fetch(&mut tasks, &mut in_flight, fetch);
                }
            }

            if tasks.is_empty() {
                if !interrupted && !self.scheduler.is_empty() {
                    tracing::info!("Page limit reached; remaining links are not fetched");
                }
                break;
            }

            let joined = tokio::select! {
                biased;

                _ = &mut shutdown, if !interrupted => {
                    tracing::warn!(
                        "Interrupted; waiting for {} in-flight fetches",
                        tasks.len()
                    );
                    interrupted = true;
                    self.scheduler.clear();
                    continue;
                }

                joined = tasks.join_next_with_id() => joined,
            };

            match joined {
                Some(Ok((id, task))) => {
                    in_flight.remove(&id);
                    if let Err(e) = self.handle_task(task, interrupted) {
                        tasks.shutdown().await;
                        if let Err(finish_err) = self.sink.finish() {
                            tracing::error!("Failed to finish output: {}", finish_err);
                        }
                        return Err(e.into());
                    }
                }
                Some(Err(e)) => self.handle_lost_task(in_flight.remove(&e.id()), &e),
                None => {}
            }
        }

        self.finish(interrupted)
    }

    /// Spawns the fetch and parse of one claimed URL
    fn spawn_fetch(
        &self,
        tasks: &mut JoinSet<PageTask>,
        in_flight: &mut HashMap<Id, PendingUrl>,
        fetch: ScheduledFetch,
    ) {
        let fetcher = Arc::clone(&self.fetcher);
        let ScheduledFetch { url, permit } = fetch;

        tracing::debug!("Fetching {} (depth {})", url.url, url.depth);

        let pending = url.clone();
        let handle = tasks.spawn(async move {
            let started = Instant::now();
            let outcome = fetch_and_parse(fetcher.as_ref(), &url.url).await;
            PageTask {
                pending: url,
                outcome,
                elapsed: started.elapsed(),
                _permit: permit,
            }
        });
        in_flight.insert(handle.id(), pending);
    }

    /// Records a task that panicked or was cancelled as a failed fetch
    fn handle_lost_task(&mut self, pending: Option<PendingUrl>, error: &JoinError) {
        match pending {
            Some(pending) => {
                let url = pending.url.as_str();
                tracing::error!("Fetch task for {} failed: {}", url, error);
                self.session.registry.mark(url, VisitState::FetchFailed);
            }
            None => tracing::error!("Fetch task failed: {}", error),
        }
        self.session.stats.record_failure();
    }

    /// Records the outcome of one URL
    ///
    /// Children are only scheduled while the run is not interrupted.
    fn handle_task(&mut self, task: PageTask, interrupted: bool) -> Result<(), SinkError> {
        let PageTask {
            pending,
            outcome,
            elapsed,
            _permit,
        } = task;
        let url = pending.url.as_str();

        match outcome {
            TaskOutcome::Failed { reason } => {
                tracing::warn!("Failed to fetch {}: {}", url, reason);
                self.session.registry.mark(url, VisitState::FetchFailed);
                self.session.stats.record_failure();
            }

            TaskOutcome::Fetched {
                final_url,
                document,
                hrefs,
            } => {
                self.sink.write_page(url, &document)?;
                self.session.registry.mark(url, VisitState::Fetched);
                self.session.stats.record_page(document.len());

                let links = self.admitted_links(&final_url, &hrefs);
                let link_count = links.len();
                if !interrupted {
                    self.scheduler.schedule_children(
                        pending.depth,
                        links.into_iter().collect(),
                        &self.session.registry,
                    );
                }

                if self.verbose_pages {
                    tracing::info!(
                        "Crawled {} links in {:.2} secs at depth {}: {}",
                        link_count,
                        elapsed.as_secs_f64(),
                        pending.depth,
                        url
                    );
                } else {
                    tracing::debug!(
                        "Crawled {} links in {:.2} secs at depth {}: {}",
                        link_count,
                        elapsed.as_secs_f64(),
                        pending.depth,
                        url
                    );
                }

                self.progress
                    .update(&self.session.stats, url, pending.depth);
            }
        }

        Ok(())
    }

    /// Resolves and filters the hrefs of a page
    ///
    /// Unresolvable and absent hrefs are dropped silently. The set is ordered,
    /// which fixes the order children are scheduled in.
    fn admitted_links(&self, base: &Url, hrefs: &[Option<String>]) -> BTreeSet<Url> {
        hrefs
            .iter()
            .filter_map(|href| resolve(base, href.as_deref()))
            .filter(|url| self.session.filter.admit(url.as_str()))
            .collect()
    }

    /// Finishes the sink and builds the report
    fn finish(mut self, interrupted: bool) -> Result<CrawlReport, TripError> {
        let output = self.sink.finish()?;

        let stats = &self.session.stats;
        let report = CrawlReport {
            urls: self.session.registry.urls_in(VisitState::Fetched),
            failed: self.session.registry.urls_in(VisitState::FetchFailed),
            pages: stats.pages(),
            bytes: stats.bytes(),
            failures: stats.failures(),
            elapsed: stats.elapsed(),
            interrupted,
            output,
        };

        self.progress.finish(report.urls.len(), report.elapsed);
        tracing::info!(
            "Crawl {}: {} pages ({} failed) in {:.2} secs, written to {}",
            if interrupted { "interrupted" } else { "completed" },
            report.pages,
            report.failures,
            report.elapsed.as_secs_f64(),
            report.output.display()
        );

        Ok(report)
    }
}

/// Fetches one URL and extracts its links
///
/// A page that cannot be parsed is kept as its raw body and yields no links.
async fn fetch_and_parse<F: PageFetcher>(fetcher: &F, url: &Url) -> TaskOutcome {
    match fetcher.fetch(url).await {
        FetchResult::Success {
            final_url,
            content_type,
            body,
            ..
        } => match parse_page(&body, content_type.as_deref()) {
            Ok(parsed) => TaskOutcome::Fetched {
                final_url,
                document: parsed.document,
                hrefs: parsed.hrefs,
            },
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", url, e);
                TaskOutcome::Fetched {
                    final_url,
                    document: body,
                    hrefs: Vec::new(),
                }
            }
        },
        failed => TaskOutcome::Failed {
            reason: failed
                .failure_reason()
                .unwrap_or_else(|| "unknown error".to_string()),
        },
    }
}
