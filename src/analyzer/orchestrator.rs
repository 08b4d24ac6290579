//! Analysis orchestration
//!
//! Runs one page through fetch, parse, classify and probe under a single
//! wall-clock deadline. Fetch and parse failures abort the analysis; probe
//! failures never do.

use crate::analyzer::fetcher::{build_http_client, fetch_page, FetchedPage};
use crate::analyzer::parser::{parse_page, PageStructure};
use crate::analyzer::prober::{LinkCheckResult, LinkProber};
use crate::config::{validate, AnalyzerConfig};
use crate::state::AnalysisStage;
use crate::url::{classify, count_links, parse_target};
use crate::{AnalyzerError, Result, TransportFailure};
use reqwest::Client;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Outcome of a successful analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    /// Final page URL after redirects
    pub url: String,

    #[serde(flatten)]
    pub structure: PageStructure,

    pub internal_links: usize,
    pub external_links: usize,

    /// Broken links only, in completion order
    pub broken_links: Vec<LinkCheckResult>,
}

impl CrawlResult {
    pub fn total_links(&self) -> usize {
        self.internal_links + self.external_links
    }

    pub fn broken_count(&self) -> usize {
        self.broken_links.len()
    }
}

/// Single-page analyzer
///
/// Holds the configuration and one HTTP client whose connection pool is
/// shared by the page fetch and every link probe. Each call to
/// [`Analyzer::analyze`] is independent; nothing is cached between calls.
///
/// # Example
///
/// ```no_run
/// use page_analyzer::{Analyzer, AnalyzerConfig};
///
/// # async fn run() -> page_analyzer::Result<()> {
/// let analyzer = Analyzer::new(AnalyzerConfig::default())?;
/// let result = analyzer.analyze("example.com").await?;
/// println!("{}: {} broken links", result.structure.title, result.broken_count());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    client: Client,
    prober: LinkProber,
}

impl Analyzer {
    /// Creates an analyzer after validating the configuration
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        validate(&config)?;
        let client = build_http_client(&config.browser)?;
        let prober = LinkProber::new(client.clone(), &config.probe);

        Ok(Self {
            config,
            client,
            prober,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes one page
    pub async fn analyze(&self, target: &str) -> Result<CrawlResult> {
        self.analyze_with_cancellation(target, &CancellationToken::new())
            .await
    }

    /// Analyzes one page, abandoning work when `cancel` fires
    ///
    /// # Errors
    ///
    /// - [`AnalyzerError::Input`] when the target is not a usable URL; no
    ///   request is made
    /// - [`AnalyzerError::Transport`] when the page cannot be downloaded,
    ///   including when the deadline or cancellation cuts the fetch short
    /// - [`AnalyzerError::Parse`] when the body is not HTML
    ///
    /// Once the page is parsed the analysis always succeeds. Hitting the
    /// deadline or being cancelled while probing returns the broken links
    /// found so far.
    pub async fn analyze_with_cancellation(
        &self,
        target: &str,
        cancel: &CancellationToken,
    ) -> Result<CrawlResult> {
        let url = parse_target(target)?;
        let deadline = Instant::now() + self.config.analysis.deadline();
        let mut stage = StageTracker::new(&url);

        tracing::info!("Analyzing {}", url);

        let page = match self.fetch(&url, deadline, cancel).await {
            Ok(page) => page,
            Err(failure) => {
                stage.advance(AnalysisStage::Failed);
                tracing::warn!("Fetch failed: {}", failure);
                return Err(failure.into());
            }
        };

        stage.advance(AnalysisStage::Parsing);
        let parsed = match parse_page(&page.body) {
            Ok(parsed) => parsed,
            Err(message) => {
                stage.advance(AnalysisStage::Failed);
                tracing::warn!("Parse failed for {}: {}", page.base_url, message);
                return Err(AnalyzerError::Parse {
                    url: page.base_url.to_string(),
                    message,
                });
            }
        };

        stage.advance(AnalysisStage::Classifying);
        let links = classify(&parsed.raw_links, &page.base_url);
        let counts = count_links(&links);
        tracing::debug!(
            "{} hrefs, {} internal, {} external",
            parsed.raw_links.len(),
            counts.internal,
            counts.external
        );

        let broken_links = if links.is_empty() {
            Vec::new()
        } else {
            stage.advance(AnalysisStage::Probing);
            self.prober.probe_all(&links, deadline, cancel).await
        };

        stage.advance(AnalysisStage::Done);
        tracing::info!(
            "Analyzed {}: {} links, {} broken",
            page.base_url,
            counts.total(),
            broken_links.len()
        );

        Ok(CrawlResult {
            url: page.base_url.to_string(),
            structure: parsed.structure,
            internal_links: counts.internal,
            external_links: counts.external,
            broken_links,
        })
    }

    /// Fetches the page within the overall deadline
    async fn fetch(
        &self,
        url: &Url,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> std::result::Result<FetchedPage, TransportFailure> {
        let fetch = fetch_page(
            &self.client,
            url,
            &self.config.browser,
            self.config.fetch.timeout(),
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportFailure::Cancelled {
                url: url.to_string(),
            }),
            result = tokio::time::timeout_at(deadline, fetch) => match result {
                Ok(fetched) => fetched,
                Err(_) => Err(TransportFailure::Timeout {
                    url: url.to_string(),
                    limit: self.config.analysis.deadline(),
                }),
            },
        }
    }
}

/// Tracks and logs stage transitions for one analysis
struct StageTracker {
    url: String,
    stage: AnalysisStage,
}

impl StageTracker {
    fn new(url: &Url) -> Self {
        tracing::debug!("{}: {}", url, AnalysisStage::Fetching);
        Self {
            url: url.to_string(),
            stage: AnalysisStage::Fetching,
        }
    }

    fn advance(&mut self, next: AnalysisStage) {
        if !self.stage.can_transition_to(next) {
            tracing::warn!("{}: illegal stage change {} -> {}", self.url, self.stage, next);
            debug_assert!(false, "illegal stage change {} -> {}", self.stage, next);
        }
        tracing::debug!("{}: {} -> {}", self.url, self.stage, next);
        self.stage = next;
    }
}
