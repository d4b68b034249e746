//! Test harness for consistent setup/teardown and auto-logging.
//!
//! Provides a temporary directory per test plus a buffered logger whose
//! entries are dumped automatically when the test panics.

#![allow(dead_code)]

use super::logging::TestLogger;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestHarness {
    name: String,
    temp_dir: TempDir,
    logger: TestLogger,
}

impl TestHarness {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let logger = TestLogger::new();

        logger.info("harness", format!("Test '{name}' started"));
        logger.info(
            "harness",
            format!("Temp directory: {}", temp_dir.path().display()),
        );

        Self {
            name,
            temp_dir,
            logger,
        }
    }

    pub const fn log(&self) -> &TestLogger {
        &self.logger
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get a path within the temporary directory.
    pub fn temp_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Create a file in the temp directory, returning its full path.
    pub fn create_file(&self, name: impl AsRef<Path>, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content.as_ref()).expect("Failed to create test file");
        self.logger
            .info("harness", format!("Created test file {}", path.display()));
        path
    }

    /// Log a test section start.
    pub fn section(&self, name: &str) {
        self.logger.info("section", format!("=== {name} ==="));
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        if std::thread::panicking() {
            eprintln!("\n=== TEST FAILED: {} ===", self.name);
            eprint!("{}", self.logger.dump());
            eprintln!("=== END LOGS ===\n");
        }
    }
}
