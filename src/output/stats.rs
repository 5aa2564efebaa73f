//! Run statistics
//!
//! Only the coordinator records into these counters. They are atomics so the
//! progress line and the final report can read them through a shared reference
//! while the run holds the session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Per-run counters, created when a run starts and dropped when it ends
#[derive(Debug)]
pub struct RunStats {
    pages: AtomicU64,
    bytes: AtomicU64,
    failures: AtomicU64,
    started: Instant,
}

impl RunStats {
    /// Creates zeroed statistics starting the clock now
    pub fn new() -> Self {
        Self {
            pages: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Records one successfully processed page of `bytes` serialized bytes
    pub fn record_page(&self, bytes: usize) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Records one failed fetch
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages(&self) -> u64 {
        self.pages.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Cumulative content size in MiB
    pub fn mib(&self) -> f64 {
        self.bytes() as f64 / BYTES_PER_MIB
    }

    /// Wall time since the run started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
