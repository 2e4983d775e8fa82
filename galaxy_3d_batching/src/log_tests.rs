//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry and DefaultLogger formatting.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::BatchBuilder".to_string(),
        message: "Built 3 batches".to_string(),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_fixed_width() {
    for severity in [
        LogSeverity::Trace, LogSeverity::Debug, LogSeverity::Info,
        LogSeverity::Warn, LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
}

#[test]
fn test_log_severity_u8_round_trip() {
    for severity in [
        LogSeverity::Trace, LogSeverity::Debug, LogSeverity::Info,
        LogSeverity::Warn, LogSeverity::Error,
    ] {
        assert_eq!(LogSeverity::from_u8(severity.to_u8()), severity);
    }
    assert_eq!(LogSeverity::from_u8(200), LogSeverity::Error);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_format_plain_without_location() {
    let line = DefaultLogger::format_plain(&entry(LogSeverity::Info, None, None));
    assert!(line.contains("[INFO ]"));
    assert!(line.contains("[galaxy3d::BatchBuilder]"));
    assert!(line.ends_with("Built 3 batches"));
}

#[test]
fn test_format_plain_with_location() {
    let line = DefaultLogger::format_plain(&entry(LogSeverity::Error, Some("batch_builder.rs"), Some(42)));
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("(batch_builder.rs:42)"));
}

#[test]
fn test_default_logger_does_not_panic() {
    let logger = DefaultLogger;
    logger.log(&entry(LogSeverity::Trace, None, None));
    logger.log(&entry(LogSeverity::Warn, None, None));
    logger.log(&entry(LogSeverity::Error, Some("x.rs"), Some(1)));
}
