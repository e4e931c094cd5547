//! Error handling and probe statistics.
//!
//! This module provides:
//! - Fatal scan errors (usage, input, output)
//! - Initialization errors
//! - Per-domain probe errors and their categorization
//! - Atomic counters for absorbed probe failures

mod stats;
mod types;

// Re-export public API
pub use stats::ProbeStats;
pub use types::{InitializationError, ProbeError, ProbeFailureKind, ScanError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use strum::IntoEnumIterator;

    #[test]
    fn test_probe_stats_initialization() {
        let stats = ProbeStats::new();
        for kind in ProbeFailureKind::iter() {
            assert_eq!(stats.get_count(kind), 0);
        }
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_probe_stats_record_categorizes() {
        let stats = ProbeStats::new();
        stats.record(&ProbeError::Timeout(Duration::from_secs(15)));
        stats.record(&ProbeError::Timeout(Duration::from_secs(15)));
        stats.record(&ProbeError::TooManyRedirects(10));
        stats.record(&ProbeError::Browser("crashed".to_string()));

        assert_eq!(stats.get_count(ProbeFailureKind::Timeout), 2);
        assert_eq!(stats.get_count(ProbeFailureKind::TooManyRedirects), 1);
        assert_eq!(stats.get_count(ProbeFailureKind::Other), 1);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn test_invalid_location_kind() {
        let source = url::Url::parse("http://[::1").unwrap_err();
        let error = ProbeError::InvalidLocation {
            location: "http://[::1".to_string(),
            source,
        };
        assert_eq!(
            ProbeFailureKind::from(&error),
            ProbeFailureKind::InvalidLocation
        );
        assert!(error.to_string().contains("http://[::1"));
    }

    #[test]
    fn test_undecodable_location_counts_as_invalid_location() {
        let error = ProbeError::UndecodableLocation("/caf\u{fffd}".to_string());
        assert_eq!(
            ProbeFailureKind::from(&error),
            ProbeFailureKind::InvalidLocation
        );
    }

    #[test]
    fn test_scan_error_messages_name_the_path() {
        let err = ScanError::OutputIo {
            path: "/nonexistent/out.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/nonexistent/out.txt"));

        let err = ScanError::Usage("max_concurrency must be at least 1".to_string());
        assert!(err.to_string().starts_with("Configuration validation failed"));
    }

    #[test]
    fn test_failure_kind_labels_are_unique() {
        let labels: std::collections::HashSet<_> =
            ProbeFailureKind::iter().map(|k| k.as_str()).collect();
        assert_eq!(labels.len(), ProbeFailureKind::iter().count());
    }
}
