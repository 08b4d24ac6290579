//! Configuration loading tests

use page_analyzer::config::{load_config, load_config_with_hash};
use page_analyzer::{Analyzer, ConfigError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_partial_config_file() {
    let file = write_config(
        r#"
[analysis]
deadline-secs = 30

[fetch]
timeout-secs = 10

[probe]
max-concurrent = 4
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.analysis.deadline_secs, 30);
    assert_eq!(config.fetch.timeout_secs, 10);
    assert_eq!(config.probe.max_concurrent, 4);
    assert_eq!(config.probe.timeout_secs, 15);
    assert_eq!(config.queue.workers, 4);

    assert!(Analyzer::new(config).is_ok());
}

#[test]
fn test_fetch_timeout_must_fit_deadline() {
    let file = write_config(
        r#"
[analysis]
deadline-secs = 10

[fetch]
timeout-secs = 10
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_hash_changes_with_content() {
    let first = write_config("[probe]\nmax-concurrent = 5\n");
    let second = write_config("[probe]\nmax-concurrent = 6\n");

    let (_, first_hash) = load_config_with_hash(first.path()).unwrap();
    let (_, second_hash) = load_config_with_hash(second.path()).unwrap();

    assert_eq!(first_hash.len(), 64);
    assert_ne!(first_hash, second_hash);
}
