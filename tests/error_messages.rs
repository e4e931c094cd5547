//! Fatal scan errors and their messages.

mod helpers;

use std::path::PathBuf;
use std::sync::Arc;

use redirect_check::{run_scan, run_scan_with, ScanError};
use tempfile::TempDir;

use helpers::{report_path, test_config, write_domains, ScriptedNavigator};

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("does_not_exist.txt");
    let output = report_path(&dir);

    let err = run_scan_with(test_config(&input, &output), Arc::new(ScriptedNavigator::new()))
        .await
        .unwrap_err();

    match err.downcast_ref::<ScanError>() {
        Some(ScanError::InputIo { path, .. }) => assert_eq!(path, &input),
        other => panic!("expected InputIo, got {:?}", other),
    }
    assert!(err.to_string().contains("does_not_exist.txt"));
    assert!(!output.exists(), "no report should be written");
}

#[tokio::test]
async fn test_missing_input_probes_nothing() {
    let dir = TempDir::new().unwrap();
    let navigator = Arc::new(ScriptedNavigator::new());

    let result = run_scan_with(
        test_config(&dir.path().join("missing.txt"), &report_path(&dir)),
        navigator.clone(),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(navigator.calls(), 0);
}

#[tokio::test]
async fn test_empty_input_path_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&PathBuf::new(), &report_path(&dir));

    let err = run_scan(config).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::Usage(_))
    ));
    assert!(err.to_string().contains("Configuration validation failed"));
}

#[tokio::test]
async fn test_zero_concurrency_is_usage_error() {
    let input = write_domains(&["foo.com"]);
    let dir = TempDir::new().unwrap();
    let mut config = test_config(input.path(), &report_path(&dir));
    config.max_concurrency = 0;

    let navigator = Arc::new(ScriptedNavigator::new());
    let err = run_scan_with(config, navigator.clone()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScanError>(),
        Some(ScanError::Usage(msg)) if msg.contains("max_concurrency")
    ));
    assert_eq!(navigator.calls(), 0);
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let input = write_domains(&["foo.com"]);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no_such_dir").join("redirects.txt");

    let navigator = ScriptedNavigator::new().route("http://foo.com", "http://bar.com");
    let err = run_scan_with(test_config(input.path(), &output), Arc::new(navigator))
        .await
        .unwrap_err();

    match err.downcast_ref::<ScanError>() {
        Some(ScanError::OutputIo { path, .. }) => assert_eq!(path, &output),
        other => panic!("expected OutputIo, got {:?}", other),
    }
    assert!(format!("{:#}", err).contains("Failed to write report"));
}

#[tokio::test]
async fn test_probe_failures_do_not_fail_the_scan() {
    let input = write_domains(&["slow.com"]);
    let dir = TempDir::new().unwrap();
    let output = report_path(&dir);
    let mut config = test_config(input.path(), &output);
    config.timeout_seconds = 1;

    let report = run_scan_with(config, Arc::new(ScriptedNavigator::new().slow("slow.com")))
        .await
        .unwrap();

    assert_eq!(report.probe_failures, 1);
    assert_eq!(report.notable, 0);
    assert!(output.exists());
}
