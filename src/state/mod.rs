//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitState`: Tracks the state of individual URLs (claimed, fetched, failed)
//! - `VisitedRegistry`: The per-run map of claimed URLs guaranteeing at-most-once fetches

mod registry;
mod visit_state;

// Re-export main types
pub use registry::VisitedRegistry;
pub use visit_state::VisitState;
