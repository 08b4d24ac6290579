//! URL handling module for the page analyzer
//!
//! This module provides target parsing, host extraction, and the link
//! classifier that turns raw hrefs into absolute, scope-tagged URLs.

mod classify;
mod domain;
mod target;

// Re-export main functions
pub use classify::{classify, count_links, ClassifiedLink, LinkCounts, LinkScope};
pub use domain::{extract_domain, host_key};
pub use target::parse_target;
