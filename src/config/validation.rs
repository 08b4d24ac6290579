use crate::config::types::{AnalyzerConfig, BrowserConfig, ProbeConfig, QueueConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    validate_timeouts(config)?;
    validate_probe_config(&config.probe)?;
    validate_browser_config(&config.browser)?;
    validate_queue_config(&config.queue)?;
    Ok(())
}

/// Validates the nesting of the deadline and the per-request timeouts
fn validate_timeouts(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if config.analysis.deadline_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "deadline_secs must be >= 1, got {}",
            config.analysis.deadline_secs
        )));
    }

    if config.fetch.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch timeout_secs must be >= 1, got {}",
            config.fetch.timeout_secs
        )));
    }

    // The primary fetch must leave part of the deadline for probing
    if config.fetch.timeout_secs >= config.analysis.deadline_secs {
        return Err(ConfigError::Validation(format!(
            "fetch timeout_secs ({}) must be shorter than deadline_secs ({})",
            config.fetch.timeout_secs, config.analysis.deadline_secs
        )));
    }

    Ok(())
}

/// Validates link probing configuration
fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "probe timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates outgoing request headers
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("user_agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept_language", &config.accept_language),
    ] {
        if reqwest::header::HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid header value: '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates worker pool configuration
fn validate_queue_config(config: &QueueConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "capacity must be >= 1, got {}",
            config.capacity
        )));
    }

    Ok(())
}
