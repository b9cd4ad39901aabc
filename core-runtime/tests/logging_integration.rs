//! Integration tests for logging system

use bridge_traits::time::LogLevel;
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_pii_redaction_secrets() {
    assert_eq!(redact_if_sensitive("access_token", "abc.def"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("refresh_token", "xyz"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("api_key", "k-123"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Bearer t"), "[REDACTED]");
}

#[test]
fn test_pii_redaction_emails() {
    let redacted = redact_if_sensitive("contact", "user@example.com");

    assert!(redacted.starts_with('u'));
    assert!(redacted.contains("[REDACTED]"));
    assert!(!redacted.contains("example.com"));
}

#[test]
fn test_pii_redaction_normal_values() {
    assert_eq!(redact_if_sensitive("operation_id", "12345"), "12345");
    assert_eq!(redact_if_sensitive("kind", "nutrition"), "nutrition");
    assert_eq!(redact_if_sensitive("user_id", "user_123"), "user_123");
    // No domain after the '@'
    assert_eq!(redact_if_sensitive("note", "leg day @ gym"), "leg day @ gym");
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LogFormat::default(), LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LogFormat::default(), LogFormat::Json);
}

#[test]
fn test_init_once_per_process() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn);

    init_logging(config.clone()).expect("first init succeeds");

    match init_logging(config) {
        Err(Error::Logging(_)) => {}
        other => panic!("expected logging error, got {other:?}"),
    }

    tracing::warn!(operation_id = "op-1", "Logged after init");
}

#[test]
fn test_invalid_filter_is_config_error() {
    let config = LoggingConfig::default().with_filter("core_sync=loud");
    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}
