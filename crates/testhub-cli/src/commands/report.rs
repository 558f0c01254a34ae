//! Execution and issue summary.

use clap::Args;

use testhub_core::result::AppResult;
use testhub_service::ReportSummary;

use crate::context::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the report command
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Only count runs and issues from the last N days
    #[arg(short, long)]
    pub days: Option<u32>,
}

/// Execute the report command
pub async fn execute(args: &ReportArgs, session: &Session, format: OutputFormat) -> AppResult<()> {
    let report = session.reports.summary(args.days).await?;
    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &ReportSummary) {
    let window = report
        .window_days
        .map_or_else(|| "all time".to_string(), |days| format!("last {days} days"));
    let runs = &report.test_execution;
    let issues = &report.issues;

    println!("Report ({window})");
    output::print_kv("test cases", &report.test_cases.to_string());
    output::print_kv("coverage", &format!("{}%", report.coverage));
    println!("[runs]");
    output::print_kv("total", &runs.total.to_string());
    output::print_kv(
        "passed/failed/blocked",
        &format!("{}/{}/{}", runs.passed, runs.failed, runs.blocked),
    );
    output::print_kv("pass rate", &format!("{}%", runs.pass_rate));
    println!("[issues]");
    output::print_kv("total", &issues.total.to_string());
    output::print_kv(
        "critical/high/medium/low",
        &format!(
            "{}/{}/{}/{}",
            issues.critical, issues.high, issues.medium, issues.low
        ),
    );
    output::print_kv("open", &issues.open.to_string());
    output::print_kv("resolved", &issues.resolved.to_string());
    output::print_kv("resolution rate", &format!("{}%", issues.resolution_rate));
}
