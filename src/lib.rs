//! Conformance harness for vanity keypair generators.
//!
//! Judges independently built vanity-address CLIs against a single pair of
//! oracles: which prefix inputs must be rejected, and which output-path
//! conditions must refuse the write. Implementations are exercised as black
//! boxes through their CLI contract; the harness observes exit codes and
//! filesystem state, never artifact content.

#![forbid(unsafe_code)]
#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

pub mod cases;
pub mod cli;
pub mod console;
pub mod driver;
pub mod error;
pub mod fixtures;
pub mod oracle;
pub mod path_oracle;
pub mod report;
pub mod runner;

pub use error::{Error, Result};
