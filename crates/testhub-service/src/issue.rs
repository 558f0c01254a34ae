//! Issue reporting and workflow.

use std::sync::Arc;

use tracing::info;

use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::traits::EntityStore;
use testhub_core::types::{IssueId, TestCaseId};
use testhub_entity::issue::{CreateIssue, Issue, IssueStatus, UpdateIssue};

/// Reports issues and moves them through their workflow.
pub struct IssueService {
    /// Issue records.
    issues: Arc<dyn EntityStore<Issue>>,
}

impl IssueService {
    /// Creates a new issue service.
    pub fn new(issues: Arc<dyn EntityStore<Issue>>) -> Self {
        Self { issues }
    }

    /// Every issue, optionally only those raised against one test case.
    pub async fn list(&self, test_case_id: Option<&TestCaseId>) -> AppResult<Vec<Issue>> {
        let issues = self.issues.get_all().await?;
        Ok(match test_case_id {
            Some(id) => issues
                .into_iter()
                .filter(|issue| issue.test_case_id.as_ref() == Some(id))
                .collect(),
            None => issues,
        })
    }

    /// Files a new issue.
    pub async fn report(&self, req: CreateIssue) -> AppResult<Issue> {
        if req.title.trim().is_empty() {
            return Err(AppError::validation("Issue title cannot be empty"));
        }
        let issue = self.issues.create(req).await?;
        info!(issue_id = %issue.id, severity = issue.severity.as_str(), "Issue reported");
        Ok(issue)
    }

    /// Moves an issue to a new status, enforcing the workflow.
    pub async fn change_status(&self, id: &IssueId, next: IssueStatus) -> AppResult<Issue> {
        let issue = self
            .issues
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Issue not found: {id}")))?;

        if !issue.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "Issue {id} cannot move from {} to {}",
                issue.status.as_str(),
                next.as_str()
            )));
        }

        let updated = self
            .issues
            .update(
                id,
                UpdateIssue {
                    status: Some(next),
                    ..Default::default()
                },
            )
            .await?;

        info!(
            issue_id = %id,
            from = issue.status.as_str(),
            to = next.as_str(),
            "Issue status changed"
        );
        Ok(updated)
    }
}
