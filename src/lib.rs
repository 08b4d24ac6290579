//! Page Analyzer: single-page structure and link health inspection
//!
//! This crate downloads one web page, summarizes its structure (title,
//! headings, doctype, login form), classifies every outbound hyperlink as
//! internal or external, and probes each one for liveness under bounded
//! parallelism and a wall-clock deadline.

pub mod analyzer;
pub mod config;
pub mod output;
pub mod queue;
pub mod state;
pub mod url;

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main error type for page analysis
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Invalid target URL: {0}")]
    Input(#[from] UrlError),

    #[error(transparent)]
    Transport(#[from] TransportFailure),

    #[error("parsing error: failed to parse HTML from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl AnalyzerError {
    /// Returns the coarse category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) => ErrorKind::InvalidInput,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Config(_) | Self::Client(_) => ErrorKind::Config,
        }
    }
}

/// Coarse error category surfaced to callers that store failures
///
/// Serialized and displayed under the same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "invalid-input")]
    InvalidInput,
    #[serde(rename = "transport-failure")]
    Transport,
    #[serde(rename = "parse-failure")]
    Parse,
    #[serde(rename = "config")]
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid-input",
            Self::Transport => "transport-failure",
            Self::Parse => "parse-failure",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of the primary page fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("website not found: {url} does not exist")]
    HostNotFound { url: String },

    #[error("connection refused: {url} is not accepting connections")]
    ConnectionRefused { url: String },

    #[error("SSL certificate error: {url} has invalid certificate")]
    Tls { url: String },

    #[error("website timeout: {url} took too long to respond (>{}s)", .limit.as_secs())]
    Timeout { url: String, limit: Duration },

    #[error("website error: {url} returned {status} {reason}")]
    HttpStatus {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("request cancelled: analysis of {url} was abandoned")]
    Cancelled { url: String },

    #[error("network error: {message}")]
    Network { url: String, message: String },
}

impl TransportFailure {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::HostNotFound { url }
            | Self::ConnectionRefused { url }
            | Self::Tls { url }
            | Self::Timeout { url, .. }
            | Self::HttpStatus { url, .. }
            | Self::Cancelled { url }
            | Self::Network { url, .. } => url,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Target URL is empty")]
    Empty,

    #[error("Failed to parse URL '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Host '{0}' is not a fully qualified domain name")]
    UnqualifiedHost(String),
}

/// Errors raised by the analysis job queue
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Analysis queue is full")]
    Full,

    #[error("Analysis queue is closed")]
    Closed,

    #[error("Invalid job status transition: {from} -> {to}")]
    InvalidTransition {
        from: state::JobStatus,
        to: state::JobStatus,
    },
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::{
    Analyzer, CrawlResult, HtmlVersion, LinkCheckResult, LinkStatus, PageStructure,
};
pub use config::AnalyzerConfig;
pub use queue::{AnalysisQueue, JobEvent, JobId, JobRecord};
pub use state::{AnalysisStage, JobStatus};
pub use crate::url::{classify, parse_target, ClassifiedLink, LinkScope};
