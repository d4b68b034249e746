//! Error types for the conformance harness.

use thiserror::Error;

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the conformance harness.
///
/// Only a handful of conditions are fatal to a run; oracle mismatches,
/// timeouts, and cleanup problems are folded into case outcomes instead of
/// surfacing here (see the driver).
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem fixture could not be established.
    #[error("Fixture error: {scenario}: {message}")]
    Fixture { scenario: String, message: String },

    /// Target manifest errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a fixture error.
    pub fn fixture(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fixture {
            scenario: scenario.into(),
            message: message.into(),
        }
    }

    /// Create a manifest error.
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest(message.into())
    }
}
