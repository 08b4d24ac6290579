//! Page analysis pipeline
//!
//! This module contains the pieces that turn a target URL into a
//! [`CrawlResult`]: the fetcher, the HTML parser with doctype detection,
//! the concurrent link prober, and the orchestrator that ties them together.

mod doctype;
mod fetcher;
mod orchestrator;
mod parser;
mod prober;

pub use doctype::HtmlVersion;
pub use fetcher::{build_http_client, classify_transport_error, fetch_page, FetchedPage};
pub use orchestrator::{Analyzer, CrawlResult};
pub use parser::{parse_page, PageStructure, ParsedPage};
pub use prober::{LinkCheckResult, LinkProber, LinkStatus};

use crate::config::AnalyzerConfig;

/// Analyzes a single target with a one-off analyzer
///
/// Convenient for one-shot callers; long-lived callers should build an
/// [`Analyzer`] once and reuse its connection pool.
pub async fn analyze_url(config: AnalyzerConfig, target: &str) -> crate::Result<CrawlResult> {
    Analyzer::new(config)?.analyze(target).await
}
