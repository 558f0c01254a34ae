//! Issue CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use testhub_core::result::AppResult;
use testhub_core::types::{IssueId, TestCaseId};
use testhub_entity::issue::{CreateIssue, Issue, IssueStatus, Severity};

use crate::context::Session;
use crate::output::{self, OutputFormat};

/// Arguments for issue commands
#[derive(Debug, Args)]
pub struct IssueArgs {
    /// Issue subcommand
    #[command(subcommand)]
    pub command: IssueCommand,
}

/// Issue subcommands
#[derive(Debug, Subcommand)]
pub enum IssueCommand {
    /// List issues
    List {
        /// Only issues raised against this test case
        #[arg(short, long)]
        test_case: Option<String>,
    },
    /// Report a new issue
    Report {
        /// Short title
        title: String,
        /// Severity: critical, high, medium or low
        #[arg(short, long, default_value = "medium")]
        severity: Severity,
        /// Related test case ID
        #[arg(short, long)]
        test_case: Option<String>,
        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Move an issue to a new workflow status
    Status {
        /// Issue ID
        id: String,
        /// New status: in_progress, fixed, verified or closed
        status: IssueStatus,
    },
}

/// Issue display row
#[derive(Debug, Serialize, Tabled)]
struct IssueRow {
    /// Issue ID
    id: String,
    /// Title
    title: String,
    /// Severity
    severity: String,
    /// Status
    status: String,
    /// Related test case
    test_case: String,
    /// Reported at
    reported_at: String,
}

impl From<&Issue> for IssueRow {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id.to_string(),
            title: issue.title.clone(),
            severity: issue.severity.to_string(),
            status: issue.status.to_string(),
            test_case: issue
                .test_case_id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            reported_at: issue.reported_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute issue commands
pub async fn execute(args: &IssueArgs, session: &Session, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        IssueCommand::List { test_case } => {
            let test_case = test_case.as_deref().map(TestCaseId::new);
            let issues = session.issues.list(test_case.as_ref()).await?;
            let rows: Vec<IssueRow> = issues.iter().map(IssueRow::from).collect();
            output::print_list(&rows, format);
        }
        IssueCommand::Report {
            title,
            severity,
            test_case,
            description,
        } => {
            let issue = session
                .issues
                .report(CreateIssue {
                    title: title.clone(),
                    description: description.clone(),
                    severity: *severity,
                    test_case_id: test_case.as_deref().map(TestCaseId::new),
                    ..Default::default()
                })
                .await?;
            output::print_result(
                &issue,
                &format!("Issue '{}' reported (id: {})", issue.title, issue.id),
                format,
            );
        }
        IssueCommand::Status { id, status } => {
            let issue = session
                .issues
                .change_status(&IssueId::new(id), *status)
                .await?;
            output::print_result(
                &issue,
                &format!("Issue {} is now {}", issue.id, issue.status),
                format,
            );
        }
    }

    Ok(())
}
