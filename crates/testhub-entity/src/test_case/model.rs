//! Test case entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use testhub_core::traits::Entity;
use testhub_core::types::TestCaseId;

use super::status::{Priority, RunStatus};

/// A test case. The folder tree references it by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Unique test case identifier.
    pub id: TestCaseId,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Steps to perform, in order.
    #[serde(default)]
    pub steps: Vec<String>,
    /// What a passing run looks like.
    #[serde(default)]
    pub expected_result: String,
    /// Priority.
    #[serde(default)]
    pub priority: Priority,
    /// Status of the latest run (None if never run).
    #[serde(default)]
    pub last_run_status: Option<RunStatus>,
    /// When the test case was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When the test case was last updated.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestCase {
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Steps; blank entries are dropped on creation.
    #[serde(default)]
    pub steps: Vec<String>,
    /// What a passing run looks like.
    #[serde(default)]
    pub expected_result: String,
    /// Priority.
    #[serde(default)]
    pub priority: Priority,
}

/// Partial update for a test case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestCase {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement steps.
    pub steps: Option<Vec<String>>,
    /// New expected result.
    pub expected_result: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// Latest run status.
    pub last_run_status: Option<RunStatus>,
}

impl Entity for TestCase {
    type Id = TestCaseId;
    type Create = CreateTestCase;
    type Patch = UpdateTestCase;

    const KIND: &'static str = "Test case";

    fn id(&self) -> &TestCaseId {
        &self.id
    }

    fn create(fields: CreateTestCase) -> Self {
        let now = Utc::now();
        Self {
            id: TestCaseId::generate(),
            title: fields.title,
            description: fields.description,
            steps: fields
                .steps
                .into_iter()
                .filter(|step| !step.trim().is_empty())
                .collect(),
            expected_result: fields.expected_result,
            priority: fields.priority,
            last_run_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, patch: UpdateTestCase) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(expected_result) = patch.expected_result {
            self.expected_result = expected_result;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.last_run_status {
            self.last_run_status = Some(status);
        }
        self.updated_at = Utc::now();
    }
}
