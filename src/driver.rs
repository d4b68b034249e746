//! Conformance driver: cases × implementations against the oracles.
//!
//! Runs sequentially in a single thread of control; no two fixtures are
//! ever active at once, and the only run-wide mutable state is the record
//! list feeding the report.

use crate::cases::{self, PathScenario, PrefixCase, Suite};
use crate::console::Console;
use crate::error::Result;
use crate::fixtures::FixtureManager;
use crate::oracle::{self, Verdict};
use crate::path_oracle;
use crate::report::{CaseRecord, RunReport};
use crate::runner::{ImplementationTarget, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;
use std::time::Duration;

/// Probe prefix used for path scenarios: valid, single character, so the
/// search itself terminates almost immediately.
const PATH_PROBE_PREFIX: &[u8] = b"a";

/// Which suites to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFilter {
    All,
    Prefix,
    Path,
}

impl SuiteFilter {
    const fn wants(self, suite: Suite) -> bool {
        matches!(
            (self, suite),
            (Self::All, _) | (Self::Prefix, Suite::Prefix) | (Self::Path, Suite::Path)
        )
    }
}

/// Options for [`run`].
pub struct DriverOptions {
    pub targets: Vec<ImplementationTarget>,
    pub suite: SuiteFilter,
    /// Only run cases whose label contains this substring.
    pub only: Option<String>,
    /// Override every per-invocation timeout ceiling, seconds.
    pub timeout_secs: Option<u64>,
}

/// Run the conformance suite and produce the final report.
pub fn run(opts: &DriverOptions, console: &Console) -> Result<RunReport> {
    let mut records = Vec::new();
    let mut notes = Vec::new();

    let available: Vec<&ImplementationTarget> = opts
        .targets
        .iter()
        .filter(|target| {
            if target.locate().is_some() {
                console.info(&format!("{} implementation found", target.name()));
                true
            } else {
                console.info(&format!(
                    "{} implementation not built, skipping",
                    target.name()
                ));
                notes.push(format!(
                    "{} implementation not built, skipping",
                    target.name()
                ));
                false
            }
        })
        .collect();

    if available.is_empty() {
        let note = "no implementations available; nothing to check".to_string();
        console.info(&note);
        notes.push(note);
        return Ok(RunReport::from_records(records, notes));
    }

    let fixtures = FixtureManager::new()?;

    if opts.suite.wants(Suite::Prefix) {
        for case in cases::PREFIX_CASES {
            if !selected(&opts.only, case.description) {
                continue;
            }
            run_prefix_case(case, &available, &fixtures, opts, console, &mut records);
        }
    }

    if opts.suite.wants(Suite::Path) {
        for scenario in cases::PATH_SCENARIOS {
            if !selected(&opts.only, scenario.name) {
                continue;
            }
            run_path_scenario(
                scenario,
                &available,
                &fixtures,
                opts,
                console,
                &mut records,
                &mut notes,
            );
        }
    }

    Ok(RunReport::from_records(records, notes))
}

fn selected(only: &Option<String>, label: &str) -> bool {
    only.as_deref().is_none_or(|needle| {
        label.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
    })
}

fn run_prefix_case(
    case: &PrefixCase,
    available: &[&ImplementationTarget],
    fixtures: &FixtureManager,
    opts: &DriverOptions,
    console: &Console,
    records: &mut Vec<CaseRecord>,
) {
    let expected = oracle::classify(case.input);
    debug_assert_eq!(expected, case.expected);
    console.line(&format!(
        "Testing: {} (should {})",
        case.description,
        if expected.accepted() { "accept" } else { "reject" }
    ));

    for target in available {
        let output = prefix_output_path(fixtures, target);
        let timeout = Duration::from_secs(opts.timeout_secs.unwrap_or(target.timeout_secs()));
        let invocation = target.invoke(case.input, &output, timeout);

        // A timeout counts as "did not succeed": acceptable exactly when
        // rejection was expected.
        if invocation.succeeded == expected.accepted() {
            console.pass(&format!("{}: {}", target.name(), case.description));
            records.push(CaseRecord::pass(
                Suite::Prefix,
                case.description,
                target.name(),
                expected,
            ));
        } else {
            console.fail(&format!(
                "{}: {}: expected {}, got {}",
                target.name(),
                case.description,
                expected.outcome_label(),
                invocation.describe()
            ));
            records.push(
                CaseRecord::fail(Suite::Prefix, case.description, target.name(), expected)
                    .with_detail(invocation.describe()),
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_path_scenario(
    scenario: &PathScenario,
    available: &[&ImplementationTarget],
    fixtures: &FixtureManager,
    opts: &DriverOptions,
    console: &Console,
    records: &mut Vec<CaseRecord>,
    notes: &mut Vec<String>,
) {
    let mut fixture = match fixtures.establish(scenario.fixture) {
        Ok(fixture) => fixture,
        Err(err) => {
            let note = format!("{}: setup failed: {err}", scenario.name);
            console.info(&note);
            notes.push(note);
            for target in available {
                records.push(CaseRecord::skip(
                    Suite::Path,
                    scenario.name,
                    target.name(),
                    scenario.expected,
                ));
            }
            return;
        }
    };

    // Cross-check the stated expectation against the oracle's reading of
    // the live state. Disagreement means the environment could not realize
    // the condition (e.g. a uid-0 run writes through 0o500 directories), so
    // the scenario is skipped rather than charged against implementations.
    let expected = path_oracle::classify(fixture.target());
    if expected != scenario.expected {
        let note = format!(
            "{}: environment cannot realize this condition (oracle says {expected}), skipping",
            scenario.name
        );
        console.info(&note);
        notes.push(note);
        for target in available {
            records.push(CaseRecord::skip(
                Suite::Path,
                scenario.name,
                target.name(),
                scenario.expected,
            ));
        }
        fixture.dismantle();
        return;
    }

    console.line(&format!("Testing: {}", scenario.name));
    console.line(&format!("  Expected: {}", expected.outcome_label()));

    for target in available {
        let timeout = Duration::from_secs(opts.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let invocation = target.invoke(PATH_PROBE_PREFIX, fixture.target(), timeout);

        if invocation.succeeded == expected.accepted() {
            console.pass(&format!(
                "{}: {} as expected",
                target.name(),
                if invocation.succeeded { "succeeded" } else { "failed" }
            ));
            records.push(CaseRecord::pass(
                Suite::Path,
                scenario.name,
                target.name(),
                expected,
            ));
        } else {
            console.fail(&format!(
                "{}: expected {}, got {}",
                target.name(),
                expected.outcome_label(),
                invocation.describe()
            ));
            records.push(
                CaseRecord::fail(Suite::Path, scenario.name, target.name(), expected)
                    .with_detail(invocation.describe()),
            );
        }
    }

    fixture.dismantle();
}

fn prefix_output_path(fixtures: &FixtureManager, target: &ImplementationTarget) -> PathBuf {
    fixtures
        .root()
        .join(format!("{}-fuzz-output.json", target.name()))
}
