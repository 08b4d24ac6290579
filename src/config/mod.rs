//! Configuration module for the page analyzer
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default, so an absent file is equivalent to
//! [`AnalyzerConfig::default`].
//!
//! # Example
//!
//! ```no_run
//! use page_analyzer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("analyzer.toml")).unwrap();
//! println!("Probing with {} concurrent requests", config.probe.max_concurrent);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnalysisConfig, AnalyzerConfig, BrowserConfig, FetchConfig, ProbeConfig, QueueConfig,
    DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
