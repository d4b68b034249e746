//! Conformance run reports.
//!
//! Records one row per (case, implementation) pair, plus run-level notes
//! for skips and absences. Renders as human text or JSON; the tally maps
//! directly onto the process exit code.

use crate::cases::Suite;
use crate::error::Result;
use crate::oracle::Verdict;
use serde::Serialize;
use std::fmt::Write as _;

// ── Core Types ──────────────────────────────────────────────────────

/// Outcome of one (case, implementation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Observed behavior agrees with the oracle.
    Pass,
    /// Observed behavior diverges from the oracle.
    Fail,
    /// Not exercised (fixture unsupported, implementation absent).
    Skip,
}

/// A single conformance record.
#[derive(Debug, Clone, Serialize)]
pub struct CaseRecord {
    pub suite: Suite,
    pub case: String,
    pub implementation: String,
    pub status: CaseStatus,
    pub expected: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CaseRecord {
    pub fn pass(suite: Suite, case: impl Into<String>, implementation: impl Into<String>, expected: Verdict) -> Self {
        Self {
            suite,
            case: case.into(),
            implementation: implementation.into(),
            status: CaseStatus::Pass,
            expected,
            detail: None,
        }
    }

    pub fn fail(suite: Suite, case: impl Into<String>, implementation: impl Into<String>, expected: Verdict) -> Self {
        Self {
            suite,
            case: case.into(),
            implementation: implementation.into(),
            status: CaseStatus::Fail,
            expected,
            detail: None,
        }
    }

    pub fn skip(suite: Suite, case: impl Into<String>, implementation: impl Into<String>, expected: Verdict) -> Self {
        Self {
            suite,
            case: case.into(),
            implementation: implementation.into(),
            status: CaseStatus::Skip,
            expected,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Monotonic tally; skips are excluded from the total.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Full conformance report for one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub records: Vec<CaseRecord>,
    pub notes: Vec<String>,
    pub summary: RunSummary,
    pub conformant: bool,
}

impl RunReport {
    #[must_use]
    pub fn from_records(records: Vec<CaseRecord>, notes: Vec<String>) -> Self {
        let mut summary = RunSummary::default();
        for record in &records {
            match record.status {
                CaseStatus::Pass => summary.total += 1,
                CaseStatus::Fail => {
                    summary.total += 1;
                    summary.failed += 1;
                }
                CaseStatus::Skip => summary.skipped += 1,
            }
        }
        let conformant = summary.failed == 0;
        Self {
            records,
            notes,
            summary,
            conformant,
        }
    }

    /// Process exit code: 0 for a conformant (or vacuously passing) run,
    /// 1 when at least one divergence was found.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.conformant {
            0
        } else {
            1
        }
    }

    /// One-line summary for the end of the run.
    #[must_use]
    pub fn summary_line(&self) -> String {
        if self.summary.total == 0 {
            "No implementations were exercised; vacuously conformant.".to_string()
        } else if self.conformant {
            format!("All {} conformance checks passed!", self.summary.total)
        } else {
            format!(
                "{}/{} conformance checks failed",
                self.summary.failed, self.summary.total
            )
        }
    }

    /// Render human-friendly text output: every divergence, then notes,
    /// then the summary line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity(1024);
        for record in self.records.iter().filter(|r| r.status == CaseStatus::Fail) {
            let _ = write!(
                out,
                "FAIL [{}] {} :: {}: expected {}",
                record.suite,
                record.case,
                record.implementation,
                record.expected.outcome_label()
            );
            if let Some(detail) = &record.detail {
                let _ = write!(out, " ({detail})");
            }
            out.push('\n');
        }
        for note in &self.notes {
            let _ = writeln!(out, "note: {note}");
        }
        let _ = writeln!(out, "{}", self.summary_line());
        out
    }

    /// Render as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
