//! Concurrent link liveness probing
//!
//! Every classified link gets its own task issuing a HEAD request. A counting
//! semaphore caps how many run at once, and a single collector owns the
//! result list, receiving outcomes over a channel. The collector stops at the
//! overall deadline or on cancellation, keeping whatever arrived before that.

use crate::analyzer::fetcher::{diagnose, ErrorCause};
use crate::config::ProbeConfig;
use crate::url::{ClassifiedLink, LinkScope};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Outcome of one liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum LinkStatus {
    /// HEAD completed with a status below 400
    Reachable { status_code: u16 },

    /// HEAD failed outright, or answered with 400 or above
    Broken {
        status_code: Option<u16>,
        error: String,
    },
}

/// Per-link probe result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCheckResult {
    pub url: String,
    pub scope: LinkScope,
    #[serde(flatten)]
    pub status: LinkStatus,
}

impl LinkCheckResult {
    pub fn is_broken(&self) -> bool {
        matches!(self.status, LinkStatus::Broken { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match &self.status {
            LinkStatus::Reachable { status_code } => Some(*status_code),
            LinkStatus::Broken { status_code, .. } => *status_code,
        }
    }

    /// Error detail for broken links
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LinkStatus::Reachable { .. } => None,
            LinkStatus::Broken { error, .. } => Some(error),
        }
    }
}

/// How a probing round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Finished,
    DeadlineExceeded,
    Cancelled,
}

/// Checks links for liveness with bounded parallelism
#[derive(Debug, Clone)]
pub struct LinkProber {
    client: Client,
    max_concurrent: usize,
    timeout: Duration,
}

impl LinkProber {
    /// Creates a prober sharing the given client's connection pool
    pub fn new(client: Client, config: &ProbeConfig) -> Self {
        Self {
            client,
            max_concurrent: config.max_concurrent.max(1) as usize,
            timeout: config.timeout(),
        }
    }

    /// Probes every link and returns only the broken ones
    ///
    /// # Deadline and Cancellation
    ///
    /// - Once `deadline` passes, waiting stops; probes still in flight are
    ///   aborted and their links are simply absent from the result
    /// - When `cancel` fires, no new requests start and in-flight ones are
    ///   dropped at their next await point; results collected so far are
    ///   still returned
    ///
    /// Result order follows completion, not document order.
    pub async fn probe_all(
        &self,
        links: &[ClassifiedLink],
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Vec<LinkCheckResult> {
        if links.is_empty() {
            return Vec::new();
        }

        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let (tx, mut rx) = mpsc::channel::<LinkCheckResult>(self.max_concurrent);
        let mut probes = JoinSet::new();

        for link in links {
            if cancel.is_cancelled() {
                break;
            }

            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            let cancel = cancel.clone();
            let client = self.client.clone();
            let link = link.clone();
            let timeout = self.timeout;

            probes.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return,
                    },
                };

                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    result = probe_link(&client, &link, timeout) => result,
                };

                // The collector may already be gone after the deadline
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut broken = Vec::new();
        let mut checked = 0usize;

        let completion = {
            let collect = async {
                while let Some(result) = rx.recv().await {
                    checked += 1;
                    if result.is_broken() {
                        broken.push(result);
                    }
                }
            };

            tokio::select! {
                _ = collect => Completion::Finished,
                _ = tokio::time::sleep_until(deadline) => Completion::DeadlineExceeded,
                _ = cancel.cancelled() => Completion::Cancelled,
            }
        };

        if completion != Completion::Finished {
            probes.abort_all();
            // Results that landed before the cut-off still count
            while let Ok(result) = rx.try_recv() {
                checked += 1;
                if result.is_broken() {
                    broken.push(result);
                }
            }
        }

        match completion {
            Completion::Finished => tracing::info!(
                "Probed {} links in {:?}: {} broken",
                checked,
                started.elapsed(),
                broken.len()
            ),
            Completion::DeadlineExceeded => tracing::warn!(
                "Link probing hit the deadline: {}/{} links checked, {} broken",
                checked,
                links.len(),
                broken.len()
            ),
            Completion::Cancelled => tracing::warn!(
                "Link probing cancelled: {}/{} links checked, {} broken",
                checked,
                links.len(),
                broken.len()
            ),
        }

        broken
    }

    /// Probes a single link
    pub async fn probe(&self, link: &ClassifiedLink) -> LinkCheckResult {
        probe_link(&self.client, link, self.timeout).await
    }
}

/// Issues one HEAD request and classifies the outcome
async fn probe_link(client: &Client, link: &ClassifiedLink, timeout: Duration) -> LinkCheckResult {
    let status = match client
        .head(request_url(&link.url))
        .header(ACCEPT, "*/*")
        .timeout(timeout)
        .send()
        .await
    {
        Ok(response) => {
            let status = response.status();
            if status.as_u16() >= 400 {
                LinkStatus::Broken {
                    status_code: Some(status.as_u16()),
                    error: status_line(status),
                }
            } else {
                LinkStatus::Reachable {
                    status_code: status.as_u16(),
                }
            }
        }
        Err(e) => LinkStatus::Broken {
            status_code: None,
            error: probe_error_detail(&e),
        },
    };

    if let LinkStatus::Broken { error, .. } = &status {
        tracing::debug!("Broken link {}: {}", link.url, error);
    }

    LinkCheckResult {
        url: link.url.to_string(),
        scope: link.scope,
        status,
    }
}

/// Fragments never reach the server
fn request_url(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

fn status_line(status: reqwest::StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Normalized error detail for a failed probe
fn probe_error_detail(error: &reqwest::Error) -> String {
    match diagnose(error) {
        ErrorCause::Timeout => "Link check timeout".to_string(),
        ErrorCause::HostNotFound => "Host not found".to_string(),
        ErrorCause::ConnectionRefused => "Connection refused".to_string(),
        ErrorCause::Tls => "TLS certificate error".to_string(),
        ErrorCause::Other(detail) => format!("Network error: {}", detail),
    }
}
