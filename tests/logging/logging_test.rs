//! Tests for `src/logging.rs`.

use iym::logging::{init_production, LoggingGuard, LOG_FILE_PREFIX};

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

#[test]
fn init_production_creates_logs_dir_and_rejects_second_install() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let logs_dir = tmp.path().join("logs");
    assert!(!logs_dir.exists());

    let guard = init_production(&logs_dir).expect("first install should succeed");
    assert!(logs_dir.exists(), "logs directory should be created");

    tracing::info!(component = "test", "written to the rolling file");
    drop(guard);

    let written = std::fs::read_dir(&logs_dir)
        .expect("logs dir should be readable")
        .filter_map(Result::ok)
        .any(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(LOG_FILE_PREFIX)
        });
    assert!(written, "a rolling log file should exist");

    let second = init_production(&tmp.path().join("other"));
    assert!(second.is_err(), "global subscriber can only be installed once");
}
