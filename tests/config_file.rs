//! Integration tests for configuration loading from disk.

use std::{path::PathBuf, time::Duration};

use bioguard::config::{CaptureConfig, ConfigError, OrderingPolicy, load};

#[test]
fn shipped_default_toml_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("default.toml");
    let cfg = load(&path).expect("failed to load default.toml");

    assert_eq!(cfg.service.endpoint.as_str(), "http://localhost:8000/verify");
    assert_eq!(cfg.cadence.period, Duration::from_secs(2));
    assert_eq!(cfg.cadence.policy, OrderingPolicy::LatestIssued);
    assert!(matches!(cfg.capture, CaptureConfig::Command { ref argv, .. } if argv[0] == "fswebcam"));
    assert!(cfg.metrics_listen.is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn directory_capture_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kiosk.toml");
    std::fs::write(
        &path,
        "[capture]\nkind = \"directory\"\npath = \"/var/spool/frames\"\n[loop]\nperiod = \"750ms\"\n",
    )
    .unwrap();

    let cfg = load(&path).unwrap();
    assert_eq!(cfg.capture, CaptureConfig::Directory(PathBuf::from("/var/spool/frames")));
    assert_eq!(cfg.cadence.period, Duration::from_millis(750));
}
