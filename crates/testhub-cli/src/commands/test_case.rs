//! Test case CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use testhub_core::result::AppResult;
use testhub_core::traits::EntityStore;
use testhub_core::types::{FolderId, TestCaseId};
use testhub_entity::test_case::{CreateTestCase, Priority, RunStatus, TestCase};

use crate::context::Session;
use crate::output::{self, OutputFormat};

/// Arguments for test case commands
#[derive(Debug, Args)]
pub struct TestCaseArgs {
    /// Test case subcommand
    #[command(subcommand)]
    pub command: TestCaseCommand,
}

/// Test case subcommands
#[derive(Debug, Subcommand)]
pub enum TestCaseCommand {
    /// List test cases
    List {
        /// Only test cases directly in this folder
        #[arg(short, long, conflicts_with = "unassigned")]
        folder: Option<String>,
        /// Only test cases in no folder
        #[arg(short, long)]
        unassigned: bool,
    },
    /// Create a test case
    Create {
        /// Short title
        title: String,
        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,
        /// A step to perform; repeat for each step, in order
        #[arg(long = "step")]
        steps: Vec<String>,
        /// What a passing run looks like
        #[arg(short, long, default_value = "")]
        expected: String,
        /// Priority: high, medium or low
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// Folder to place it in (`root` or omit to leave it unassigned)
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Move a test case into a folder, or out of every folder
    Move {
        /// Test case ID
        id: String,
        /// Target folder ID (`root` or omit to unassign)
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Record the outcome of running a test case
    Execute {
        /// Test case ID
        id: String,
        /// Outcome: passed, failed or blocked
        #[arg(short, long)]
        status: RunStatus,
        /// Tester notes
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Who ran the test
        #[arg(short = 'b', long, default_value = "cli")]
        executed_by: String,
    },
}

/// Test case display row
#[derive(Debug, Serialize, Tabled)]
struct TestCaseRow {
    /// Test case ID
    id: String,
    /// Title
    title: String,
    /// Priority
    priority: String,
    /// Latest run
    last_run: String,
    /// Containing folder
    folder: String,
}

impl TestCaseRow {
    fn new(tc: &TestCase, folder: Option<FolderId>) -> Self {
        Self {
            id: tc.id.to_string(),
            title: tc.title.clone(),
            priority: tc.priority.to_string(),
            last_run: RunStatus::label(tc.last_run_status).to_string(),
            folder: folder.map_or_else(|| "-".to_string(), |f| f.to_string()),
        }
    }
}

/// Execute test case commands
pub async fn execute(
    args: &TestCaseArgs,
    session: &Session,
    format: OutputFormat,
) -> AppResult<()> {
    let tree = &session.tree;

    match &args.command {
        TestCaseCommand::List { folder, unassigned } => {
            let test_cases = match (folder, unassigned) {
                (Some(folder), _) => tree.test_cases_in_folder(&FolderId::new(folder)).await?,
                (None, true) => tree.unassigned_test_cases().await?,
                (None, false) => session.test_cases.get_all().await?,
            };

            let mut rows = Vec::with_capacity(test_cases.len());
            for tc in &test_cases {
                rows.push(TestCaseRow::new(tc, tree.folder_of_test_case(&tc.id).await));
            }
            output::print_list(&rows, format);
        }
        TestCaseCommand::Create {
            title,
            description,
            steps,
            expected,
            priority,
            folder,
        } => {
            let folder = super::target_folder(folder.as_deref());
            let test_case = tree
                .create_test_case(
                    CreateTestCase {
                        title: title.clone(),
                        description: description.clone(),
                        steps: steps.clone(),
                        expected_result: expected.clone(),
                        priority: *priority,
                    },
                    folder.as_ref(),
                )
                .await?;
            output::print_result(
                &test_case,
                &format!("Test case '{}' created (id: {})", test_case.title, test_case.id),
                format,
            );
        }
        TestCaseCommand::Move { id, to } => {
            let id = TestCaseId::new(id);
            let target = super::target_folder(to.as_deref());
            tree.move_test_case_to_folder(&id, target.as_ref()).await?;

            let destination = target.map_or_else(|| "unassigned".to_string(), |t| t.to_string());
            output::print_result(
                &serde_json::json!({"testCaseId": id, "folderId": destination}),
                &format!("Test case {id} moved to {destination}"),
                format,
            );
        }
        TestCaseCommand::Execute {
            id,
            status,
            notes,
            executed_by,
        } => {
            let recorded = session
                .execution
                .record_run(&TestCaseId::new(id), *status, notes.as_str(), executed_by.as_str())
                .await?;
            output::print_result(
                &recorded,
                &format!(
                    "Recorded {} run {} for '{}'",
                    recorded.run.status, recorded.run.id, recorded.test_case.title
                ),
                format,
            );
        }
    }

    Ok(())
}
