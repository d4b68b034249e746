//! CLI argument parsing using Clap.

use clap::Parser;
use std::path::PathBuf;

/// Cross-implementation conformance harness for vanity keypair generators.
#[derive(Parser, Debug)]
#[command(name = "vanity-conformance")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  vanity-conformance                       Run every suite against all discoverable implementations
  vanity-conformance --suite prefix        Prefix-validation cases only
  vanity-conformance --only symlink        Cases whose label contains \"symlink\"
  vanity-conformance --format json         Machine-readable report
  vanity-conformance --list                Enumerate the case corpus without running
")]
pub struct Cli {
    /// Project root containing implementation build outputs
    #[arg(long, env = "VANITY_CONFORMANCE_ROOT")]
    pub root: Option<PathBuf>,

    /// JSON manifest registering additional implementations
    #[arg(long, value_name = "FILE")]
    pub targets: Option<PathBuf>,

    /// Which suite to run
    #[arg(long, default_value = "all", value_parser = ["all", "prefix", "path"])]
    pub suite: String,

    /// Only run cases whose label contains this substring
    #[arg(long, value_name = "SUBSTRING")]
    pub only: Option<String>,

    /// Override the per-invocation timeout ceiling, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Disable ANSI colors (NO_COLOR is also honored)
    #[arg(long)]
    pub no_color: bool,

    /// List conformance cases without running them
    #[arg(long)]
    pub list: bool,
}
