//! URL handling module for Tinytrip
//!
//! This module provides link resolution, file-name derivation for persisted
//! pages, and pattern-based URL admission.

mod filename;
mod filter;
mod resolve;

// Re-export main functions
pub use filename::{to_file_name, HTML_SUFFIX, JSON_SUFFIX};
pub use filter::{Admission, PatternFilter};
pub use resolve::{parse_seed, resolve};
