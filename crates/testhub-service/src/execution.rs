//! Recording test executions.

use std::sync::Arc;

use tracing::info;

use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::traits::EntityStore;
use testhub_core::types::TestCaseId;
use testhub_entity::test_case::{RunStatus, TestCase, UpdateTestCase};
use testhub_entity::test_run::{CreateTestRun, TestRun};

/// Outcome of recording a run: the new run and the refreshed test case.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecorded {
    /// The stored run.
    pub run: TestRun,
    /// The test case with its latest status updated.
    pub test_case: TestCase,
}

/// Records test runs and keeps each test case's latest status current.
pub struct ExecutionService {
    /// Test case records.
    test_cases: Arc<dyn EntityStore<TestCase>>,
    /// Run history.
    test_runs: Arc<dyn EntityStore<TestRun>>,
}

impl ExecutionService {
    /// Creates a new execution service.
    pub fn new(
        test_cases: Arc<dyn EntityStore<TestCase>>,
        test_runs: Arc<dyn EntityStore<TestRun>>,
    ) -> Self {
        Self {
            test_cases,
            test_runs,
        }
    }

    /// Records one execution of a test case.
    ///
    /// The run is stored first; the test case's `last_run_status` follows.
    /// The two writes are independent, so a failure in the second leaves
    /// the run in place.
    pub async fn record_run(
        &self,
        test_case_id: &TestCaseId,
        status: RunStatus,
        notes: impl Into<String>,
        executed_by: impl Into<String>,
    ) -> AppResult<RunRecorded> {
        if self.test_cases.get_by_id(test_case_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Test case not found: {test_case_id}"
            )));
        }

        let run = self
            .test_runs
            .create(CreateTestRun {
                test_case_id: test_case_id.clone(),
                status,
                notes: notes.into(),
                executed_by: executed_by.into(),
            })
            .await?;

        let test_case = self
            .test_cases
            .update(
                test_case_id,
                UpdateTestCase {
                    last_run_status: Some(status),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            test_case_id = %test_case_id,
            run_id = %run.id,
            status = status.as_str(),
            "Test run recorded"
        );

        Ok(RunRecorded { run, test_case })
    }

    /// Every run of a test case, oldest first.
    pub async fn runs_for(&self, test_case_id: &TestCaseId) -> AppResult<Vec<TestRun>> {
        let mut runs: Vec<TestRun> = self
            .test_runs
            .get_all()
            .await?
            .into_iter()
            .filter(|run| &run.test_case_id == test_case_id)
            .collect();
        runs.sort_by_key(|run| run.executed_at);
        Ok(runs)
    }
}
