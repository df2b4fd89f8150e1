//! Integration tests for logging and configuration surfaces

use bridge_traits::logging::LogLevel;
use core_runtime::config::{RegistrationTimeout, ShellConfig};
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use std::time::Duration;

#[test]
fn test_init_logging_only_once() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    assert!(init_logging(config.clone()).is_ok());
    // A global subscriber is now set; installing another must fail cleanly.
    let second = init_logging(config);
    assert!(matches!(second, Err(core_runtime::Error::Logging(_))));

    tracing::debug!(target: "core_runtime", "logging initialized");
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Warn)
        .with_target(false);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.display_target);
    assert!(config.logger_sink.is_none());
}

#[test]
fn test_stored_credentials_are_redacted() {
    let stored = r#"{"username":"ada","token":"abc123"}"#;
    assert_eq!(redact_if_sensitive("credentials", stored), "[REDACTED]");
    assert_eq!(redact_if_sensitive("classrooms", "[1,2]"), "[1,2]");
}

#[test]
fn test_shell_config_serializes() {
    let config = ShellConfig::builder()
        .registration_timeout(RegistrationTimeout::Bounded(Duration::from_secs(10)))
        .build()
        .unwrap();

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["api_endpoint"], "http://localhost:8000/api/v1");
    assert_eq!(json["offline"]["script_location"], "/static/sw.js");

    let back: ShellConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}
