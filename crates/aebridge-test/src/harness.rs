//! Test harness helpers.

use std::path::PathBuf;

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber with `filter`. Later calls are no-ops.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// [`setup_test_logging`] at `warn`.
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}

/// A temporary directory holding `config.toml` with `content`, usable as
/// the user config home.
///
/// # Panics
///
/// Panics if the directory or file cannot be created.
#[must_use]
pub fn config_home(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("Failed to write config file");
    (dir, path)
}
