//! HTTP fetcher implementation
//!
//! This module handles the primary page download, including:
//! - Building the shared HTTP client with a browser user agent
//! - Browser-like request headers and transparent gzip decoding
//! - Classifying transport failures into readable error details

use crate::config::BrowserConfig;
use crate::TransportFailure;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::Client;
use std::error::Error as StdError;
use std::io;
use std::time::Duration;
use url::Url;

/// A downloaded page ready for parsing
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub requested_url: Url,

    /// Final URL after redirects; relative links resolve against it
    pub base_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Decoded page body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// The client decodes gzip bodies transparently; any other content encoding
/// is passed through untouched. Timeouts are applied per request so the
/// primary fetch and the link probes can use different budgets.
///
/// # Example
///
/// ```no_run
/// use page_analyzer::analyzer::build_http_client;
/// use page_analyzer::config::BrowserConfig;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .build()
}

/// Fetches the target page
///
/// # Failure Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | DNS lookup failed | `HostNotFound` |
/// | Connection refused | `ConnectionRefused` |
/// | TLS/certificate error | `Tls` |
/// | Request exceeded `timeout` | `Timeout` |
/// | HTTP status >= 400 | `HttpStatus` |
/// | Anything else | `Network` |
///
/// No retries happen here.
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    browser: &BrowserConfig,
    timeout: Duration,
) -> Result<FetchedPage, TransportFailure> {
    tracing::debug!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .header(ACCEPT, browser.accept.as_str())
        .header(ACCEPT_LANGUAGE, browser.accept_language.as_str())
        .header(ACCEPT_ENCODING, "gzip")
        .header(UPGRADE_INSECURE_REQUESTS, "1")
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_transport_error(url.as_str(), &e, timeout))?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(TransportFailure::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    let base_url = response.url().clone();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .text()
        .await
        .map_err(|e| classify_transport_error(url.as_str(), &e, timeout))?;

    if base_url != *url {
        tracing::debug!("{} redirected to {}", url, base_url);
    }
    tracing::debug!(
        "Fetched {} ({}, {} bytes)",
        base_url,
        status.as_u16(),
        body.len()
    );

    Ok(FetchedPage {
        requested_url: url.clone(),
        base_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Root cause of a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ErrorCause {
    Timeout,
    HostNotFound,
    ConnectionRefused,
    Tls,
    Other(String),
}

const DNS_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "no such host",
    "name or service not known",
    "nodename nor servname",
];

const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// Walks a request error's source chain to find what actually went wrong
///
/// The top-level message is skipped because it embeds the URL, which could
/// itself contain words like "ssl".
pub(crate) fn diagnose(error: &reqwest::Error) -> ErrorCause {
    if error.is_timeout() {
        return ErrorCause::Timeout;
    }

    let mut details = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(io_error) = cause.downcast_ref::<io::Error>() {
            match io_error.kind() {
                io::ErrorKind::ConnectionRefused => return ErrorCause::ConnectionRefused,
                io::ErrorKind::TimedOut => return ErrorCause::Timeout,
                _ => {}
            }
        }
        details.push(cause.to_string());
        source = cause.source();
    }

    let chain = details.join(": ");
    let lowered = chain.to_lowercase();

    if lowered.contains("connection refused") {
        ErrorCause::ConnectionRefused
    } else if DNS_MARKERS.iter().any(|m| lowered.contains(m)) {
        ErrorCause::HostNotFound
    } else if TLS_MARKERS.iter().any(|m| lowered.contains(m)) {
        ErrorCause::Tls
    } else if chain.is_empty() {
        ErrorCause::Other(error.to_string())
    } else {
        ErrorCause::Other(chain)
    }
}

/// Maps a request error to the fetch-level failure taxonomy
pub fn classify_transport_error(
    url: &str,
    error: &reqwest::Error,
    timeout: Duration,
) -> TransportFailure {
    let url = url.to_string();
    match diagnose(error) {
        ErrorCause::Timeout => TransportFailure::Timeout {
            url,
            limit: timeout,
        },
        ErrorCause::HostNotFound => TransportFailure::HostNotFound { url },
        ErrorCause::ConnectionRefused => TransportFailure::ConnectionRefused { url },
        ErrorCause::Tls => TransportFailure::Tls { url },
        ErrorCause::Other(message) => TransportFailure::Network { url, message },
    }
}
