//! Scheduler for managing the crawl frontier and fetch concurrency
//!
//! This module handles:
//! - The LIFO frontier that turns recursive descent into an explicit stack
//! - Claiming URLs in the visited registry as they leave the frontier
//! - Global concurrency limiting via a semaphore
//! - Optional depth and page limits

use crate::config::CrawlerConfig;
use crate::state::VisitedRegistry;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUrl {
    /// The URL to fetch
    pub url: Url,

    /// Link hops from the seed URL
    pub depth: u32,
}

/// A claimed URL together with its concurrency permit
///
/// The permit is released when this value (or whatever it is moved into) is
/// dropped, which frees a slot for the next fetch.
#[derive(Debug)]
pub struct ScheduledFetch {
    /// The URL to fetch
    pub url: PendingUrl,

    /// The semaphore permit for this fetch
    pub permit: OwnedSemaphorePermit,
}

/// Optional limits on how far a run may go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Children deeper than this are not scheduled
    pub max_depth: Option<u32>,

    /// No more URLs are claimed once this many have been
    pub max_pages: Option<u64>,
}

impl From<&CrawlerConfig> for CrawlLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages,
        }
    }
}

/// Scheduler manages the frontier and the number of fetches in flight
///
/// Children of a page are pushed in reverse order, so with one fetch slot the
/// URLs leave the frontier in depth-first pre-order, exactly as a recursive
/// crawl would visit them.
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Pending URLs; the top of the stack is fetched next
    frontier: Vec<PendingUrl>,

    limits: CrawlLimits,

    /// URLs claimed through this scheduler
    claimed: u64,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `concurrency` - Maximum number of fetches in flight (at least 1)
    /// * `limits` - Depth and page limits
    pub fn new(concurrency: usize, limits: CrawlLimits) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
            frontier: Vec::new(),
            limits,
            claimed: 0,
        }
    }

    /// Puts the seed URL on the frontier at depth 0
    pub fn seed(&mut self, url: Url) {
        self.frontier.push(PendingUrl { url, depth: 0 });
    }

    /// Gets the next URL to fetch, if one can start now
    ///
    /// This method:
    /// 1. Returns None if the frontier is empty or the page limit is reached
    /// 2. Tries to take a fetch slot without waiting
    /// 3. Pops URLs until one can be claimed in the registry
    /// 4. Returns the claimed URL with its slot
    ///
    /// URLs that were claimed since they were pushed are dropped here. This
    /// claim is the authoritative at-most-once guard.
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - A claimed URL that must be fetched
    /// * `None` - Nothing can start right now
    pub fn next_url(&mut self, registry: &VisitedRegistry) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() || self.page_limit_reached() {
            return None;
        }

        let permit = Arc::clone(&self.semaphore).try_acquire_owned().ok()?;

        while let Some(pending) = self.frontier.pop() {
            if registry.claim(pending.url.as_str()) {
                self.claimed += 1;
                tracing::trace!("Claimed {} at depth {}", pending.url, pending.depth);
                return Some(ScheduledFetch {
                    url: pending,
                    permit,
                });
            }
            tracing::trace!("Skipping already claimed {}", pending.url);
        }

        None
    }

    /// Adds the admitted links of a page to the frontier
    ///
    /// `children` should already be deduplicated and sorted; URLs already in
    /// the registry are skipped.
    ///
    /// # Returns
    ///
    /// The number of URLs added
    pub fn schedule_children(
        &mut self,
        parent_depth: u32,
        children: Vec<Url>,
        registry: &VisitedRegistry,
    ) -> usize {
        let depth = parent_depth + 1;
        if self.limits.max_depth.is_some_and(|max| depth > max) {
            return 0;
        }

        let before = self.frontier.len();
        for url in children.into_iter().rev() {
            if !registry.contains(url.as_str()) {
                self.frontier.push(PendingUrl { url, depth });
            }
        }
        self.frontier.len() - before
    }

    /// Drops every pending URL
    pub fn clear(&mut self) {
        self.frontier.clear();
    }

    /// Returns true once the page limit stops further claims
    pub fn page_limit_reached(&self) -> bool {
        self.limits.max_pages.is_some_and(|max| self.claimed >= max)
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
