//! Integration tests for logging system

use bridge_traits::logging::LogLevel;
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};

#[test]
fn test_logging_initialization_is_single_shot() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    init_logging(config.clone()).expect("first initialization succeeds");

    // A global subscriber is already installed
    assert!(init_logging(config).is_err());

    tracing::info!(target: "core_sync", "logging ready");
}

#[test]
fn test_pii_redaction_tokens() {
    assert_eq!(redact_if_sensitive("access_token", "abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("refresh_token", "def"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("password", "hunter2"), "[REDACTED]");
}

#[test]
fn test_pii_redaction_normal_values() {
    assert_eq!(redact_if_sensitive("section_key", "1"), "1");
    assert_eq!(redact_if_sensitive("media", "movies"), "movies");
    assert_eq!(redact_if_sensitive("data", "ratings"), "ratings");
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Warn)
        .with_pii_redaction(false)
        .with_spans(false)
        .with_target(false)
        .with_thread_info(true)
        .with_filter("core_sync=trace");

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.redact_pii);
    assert!(!config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
    assert_eq!(config.filter.as_deref(), Some("core_sync=trace"));
}
