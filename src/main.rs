//! vanity-conformance: cross-implementation conformance harness CLI.
//!
//! Exit code 0 when every exercised implementation agrees with the oracles,
//! 1 when at least one divergence was found. A run with no discoverable
//! implementations passes vacuously with an informational note.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vanity_conformance::cases::{PATH_SCENARIOS, PREFIX_CASES};
use vanity_conformance::console::Console;
use vanity_conformance::driver::{self, DriverOptions, SuiteFilter};
use vanity_conformance::{cli, runner};

fn main() {
    match main_impl() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn main_impl() -> Result<i32> {
    let cli = cli::Cli::parse();

    // Fast path that needs no tracing and touches no filesystem state.
    if cli.list {
        list_cases();
        return Ok(0);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let json = cli.format == "json";
    let console = if json {
        Console::disabled()
    } else {
        Console::auto(cli.no_color)
    };

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let mut targets = runner::builtin_targets(&root);
    if let Some(manifest) = &cli.targets {
        targets.extend(runner::load_manifest(manifest, &root)?);
    }

    let suite = match cli.suite.as_str() {
        "prefix" => SuiteFilter::Prefix,
        "path" => SuiteFilter::Path,
        _ => SuiteFilter::All,
    };

    console.heading("Vanity Generator Conformance Suite");

    let report = driver::run(
        &DriverOptions {
            targets,
            suite,
            only: cli.only,
            timeout_secs: cli.timeout_secs,
        },
        &console,
    )?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        console.heading("Summary");
        for record in report
            .records
            .iter()
            .filter(|r| r.status == vanity_conformance::report::CaseStatus::Fail)
        {
            console.fail(&format!(
                "[{}] {} :: {}: expected {}{}",
                record.suite,
                record.case,
                record.implementation,
                record.expected.outcome_label(),
                record
                    .detail
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            ));
        }
        console.verdict(report.conformant, &report.summary_line());
    }

    Ok(report.exit_code())
}

fn list_cases() {
    println!("Prefix cases:");
    for case in PREFIX_CASES {
        println!(
            "  [{}] {}",
            case.expected.outcome_label(),
            case.description
        );
    }
    println!("Path scenarios:");
    for scenario in PATH_SCENARIOS {
        println!(
            "  [{}] {}",
            scenario.expected.outcome_label(),
            scenario.name
        );
    }
}
