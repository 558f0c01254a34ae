//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use testhub_core::types::{FolderId, TestCaseId};

/// A folder in the test-case hierarchy.
///
/// Parent and child links are id references into the tree's folder map;
/// a folder never owns another folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Test cases directly assigned to this folder, in display order.
    #[serde(default)]
    pub test_case_ids: Vec<TestCaseId>,
    /// Child folders, in display order.
    #[serde(default)]
    pub child_folder_ids: Vec<FolderId>,
    /// Default expansion hint used when no saved expansion state exists.
    #[serde(default)]
    pub expanded: bool,
    /// When the folder was created.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// When the folder or its direct membership last changed.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Build a fresh folder with a generated id and empty membership.
    pub fn new(name: impl Into<String>, parent_id: Option<FolderId>) -> Self {
        let now = Utc::now();
        Self {
            id: FolderId::generate(),
            name: name.into(),
            parent_id,
            test_case_ids: Vec::new(),
            child_folder_ids: Vec::new(),
            expanded: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check whether a test case is directly assigned here.
    pub fn contains_test_case(&self, test_case_id: &TestCaseId) -> bool {
        self.test_case_ids.contains(test_case_id)
    }

    /// Refresh the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Fields that may be changed on an existing folder.
///
/// Reparenting is deliberately absent: it only happens through a folder move.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolder {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateFolder {
    /// An update that renames the folder.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
