//! Execution and issue summaries for the reports view.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use testhub_core::result::AppResult;
use testhub_core::traits::EntityStore;
use testhub_entity::issue::{Issue, Severity};
use testhub_entity::test_case::{RunStatus, TestCase};
use testhub_entity::test_run::TestRun;

/// Run outcomes inside the reporting window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub blocked: usize,
    /// Percentage of runs that passed, rounded. 0 when there are no runs.
    pub pass_rate: u32,
}

/// Issues reported inside the reporting window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Neither verified nor closed.
    pub open: usize,
    /// Fixed, verified or closed.
    pub resolved: usize,
    pub resolution_rate: u32,
}

/// Everything the reports view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Days covered, or `None` for all time.
    pub window_days: Option<u32>,
    pub test_cases: usize,
    pub test_execution: ExecutionSummary,
    pub issues: IssueSummary,
    /// All recorded runs per test case, as a rounded percentage. Ignores the
    /// window and can exceed 100.
    pub coverage: u32,
}

/// Builds report summaries from the entity stores.
pub struct ReportService {
    test_cases: Arc<dyn EntityStore<TestCase>>,
    test_runs: Arc<dyn EntityStore<TestRun>>,
    issues: Arc<dyn EntityStore<Issue>>,
}

impl ReportService {
    pub fn new(
        test_cases: Arc<dyn EntityStore<TestCase>>,
        test_runs: Arc<dyn EntityStore<TestRun>>,
        issues: Arc<dyn EntityStore<Issue>>,
    ) -> Self {
        Self {
            test_cases,
            test_runs,
            issues,
        }
    }

    /// Summary over the last `window_days` days, or over everything.
    pub async fn summary(&self, window_days: Option<u32>) -> AppResult<ReportSummary> {
        let test_cases = self.test_cases.get_all().await?;
        let runs = self.test_runs.get_all().await?;
        let issues = self.issues.get_all().await?;

        let cutoff = window_days.map(|days| Utc::now() - Duration::days(i64::from(days)));
        let report = summarize(test_cases.len(), &runs, &issues, cutoff);
        debug!(
            window_days = ?window_days,
            runs = report.test_execution.total,
            issues = report.issues.total,
            "Report built"
        );
        Ok(ReportSummary {
            window_days,
            ..report
        })
    }
}

/// Counts runs executed and issues reported at or after `cutoff`.
pub fn summarize(
    test_case_count: usize,
    runs: &[TestRun],
    issues: &[Issue],
    cutoff: Option<DateTime<Utc>>,
) -> ReportSummary {
    let in_window = |at: DateTime<Utc>| cutoff.is_none_or(|c| at >= c);

    let mut execution = ExecutionSummary::default();
    for run in runs.iter().filter(|r| in_window(r.executed_at)) {
        execution.total += 1;
        match run.status {
            RunStatus::Passed => execution.passed += 1,
            RunStatus::Failed => execution.failed += 1,
            RunStatus::Blocked => execution.blocked += 1,
        }
    }
    execution.pass_rate = percent(execution.passed, execution.total);

    let mut summary = IssueSummary::default();
    for issue in issues.iter().filter(|i| in_window(i.reported_at)) {
        summary.total += 1;
        match issue.severity {
            Severity::Critical => summary.critical += 1,
            Severity::High => summary.high += 1,
            Severity::Medium => summary.medium += 1,
            Severity::Low => summary.low += 1,
        }
        if issue.status.is_open() {
            summary.open += 1;
        }
        if issue.status.is_resolved() {
            summary.resolved += 1;
        }
    }
    summary.resolution_rate = percent(summary.resolved, summary.total);

    ReportSummary {
        window_days: None,
        test_cases: test_case_count,
        test_execution: execution,
        issues: summary,
        coverage: percent(runs.len(), test_case_count),
    }
}

/// `part / whole` as a percentage rounded half up.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let rounded = (part * 200 + whole) / (whole * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
