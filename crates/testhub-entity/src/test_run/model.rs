//! Test run entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use testhub_core::traits::Entity;
use testhub_core::types::{TestCaseId, TestRunId};

use crate::test_case::RunStatus;

/// One recorded execution of a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    /// Unique run identifier.
    pub id: TestRunId,
    /// The executed test case.
    pub test_case_id: TestCaseId,
    /// Outcome.
    pub status: RunStatus,
    /// Tester notes.
    #[serde(default)]
    pub notes: String,
    /// Who executed the test.
    #[serde(default)]
    pub executed_by: String,
    /// When the run was recorded.
    #[serde(default = "Utc::now")]
    pub executed_at: DateTime<Utc>,
}

/// Data required to record a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestRun {
    /// The executed test case.
    pub test_case_id: TestCaseId,
    /// Outcome.
    pub status: RunStatus,
    /// Tester notes.
    #[serde(default)]
    pub notes: String,
    /// Who executed the test.
    #[serde(default)]
    pub executed_by: String,
}

/// Partial update for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestRun {
    /// Corrected outcome.
    pub status: Option<RunStatus>,
    /// Replacement notes.
    pub notes: Option<String>,
}

impl Entity for TestRun {
    type Id = TestRunId;
    type Create = CreateTestRun;
    type Patch = UpdateTestRun;

    const KIND: &'static str = "Test run";

    fn id(&self) -> &TestRunId {
        &self.id
    }

    fn create(fields: CreateTestRun) -> Self {
        Self {
            id: TestRunId::generate(),
            test_case_id: fields.test_case_id,
            status: fields.status,
            notes: fields.notes,
            executed_by: fields.executed_by,
            executed_at: Utc::now(),
        }
    }

    fn apply(&mut self, patch: UpdateTestRun) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}
