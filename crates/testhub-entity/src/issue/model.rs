//! Issue entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use testhub_core::traits::Entity;
use testhub_core::types::{IssueId, TestCaseId};

use super::status::{IssueStatus, Severity};

/// A defect reported against the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique issue identifier.
    pub id: IssueId,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Impact.
    #[serde(default)]
    pub severity: Severity,
    /// Free-form category (e.g. `"UI"`).
    #[serde(default)]
    pub category: String,
    /// How to reproduce.
    #[serde(default)]
    pub reproduction_steps: String,
    /// The test case that surfaced the issue, if any.
    #[serde(default)]
    pub test_case_id: Option<TestCaseId>,
    /// Workflow status.
    pub status: IssueStatus,
    /// Attachment references.
    #[serde(default)]
    pub attachments: Vec<String>,
    /// When the issue was reported.
    #[serde(default = "Utc::now")]
    pub reported_at: DateTime<Utc>,
    /// When the issue was closed.
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Data required to report a new issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssue {
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Impact.
    #[serde(default)]
    pub severity: Severity,
    /// Free-form category.
    #[serde(default)]
    pub category: String,
    /// How to reproduce.
    #[serde(default)]
    pub reproduction_steps: String,
    /// Related test case.
    #[serde(default)]
    pub test_case_id: Option<TestCaseId>,
}

/// Partial update for an issue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssue {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New severity.
    pub severity: Option<Severity>,
    /// New category.
    pub category: Option<String>,
    /// New status. Closing stamps `resolved_at`; any other status clears it.
    pub status: Option<IssueStatus>,
}

impl Entity for Issue {
    type Id = IssueId;
    type Create = CreateIssue;
    type Patch = UpdateIssue;

    const KIND: &'static str = "Issue";

    fn id(&self) -> &IssueId {
        &self.id
    }

    fn create(fields: CreateIssue) -> Self {
        Self {
            id: IssueId::generate(),
            title: fields.title,
            description: fields.description,
            severity: fields.severity,
            category: fields.category,
            reproduction_steps: fields.reproduction_steps,
            test_case_id: fields.test_case_id,
            status: IssueStatus::New,
            attachments: Vec::new(),
            reported_at: Utc::now(),
            resolved_at: None,
        }
    }

    fn apply(&mut self, patch: UpdateIssue) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(status) = patch.status {
            self.status = status;
            self.resolved_at = (status == IssueStatus::Closed).then(Utc::now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reported() -> Issue {
        Issue::create(CreateIssue {
            title: "Login button unresponsive".into(),
            severity: Severity::Critical,
            ..Default::default()
        })
    }

    #[test]
    fn test_create_defaults() {
        let issue = reported();
        assert_eq!(issue.status, IssueStatus::New);
        assert!(issue.attachments.is_empty());
        assert!(issue.resolved_at.is_none());
    }

    #[test]
    fn test_closing_stamps_resolved_at() {
        let mut issue = reported();
        issue.apply(UpdateIssue {
            status: Some(IssueStatus::Closed),
            ..Default::default()
        });
        assert!(issue.resolved_at.is_some());

        issue.apply(UpdateIssue {
            status: Some(IssueStatus::InProgress),
            ..Default::default()
        });
        assert!(issue.resolved_at.is_none());
    }
}
