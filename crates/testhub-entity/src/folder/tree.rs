//! Folder tree structures: runtime snapshot, seed layout and derived views.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use testhub_core::types::{FolderId, TestCaseId};

use super::model::Folder;

/// The complete tree state.
///
/// Returned by value from the engine, so callers always hold an independent
/// copy and can never mutate engine-owned state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStructure {
    /// Every folder, keyed by id.
    pub folders: BTreeMap<FolderId, Folder>,
    /// Top-level folders in display order.
    pub root_folder_ids: Vec<FolderId>,
    /// Test cases not placed in any folder, in display order.
    pub unassigned_test_case_ids: Vec<TestCaseId>,
    /// Folders currently shown open.
    pub expanded_state: BTreeSet<FolderId>,
}

impl TreeStructure {
    /// Look up a folder.
    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Whether a folder exists.
    pub fn contains_folder(&self, id: &FolderId) -> bool {
        self.folders.contains_key(id)
    }

    /// Whether a folder is currently expanded.
    pub fn is_expanded(&self, id: &FolderId) -> bool {
        self.expanded_state.contains(id)
    }

    /// Total number of folders.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }
}

/// Initial tree layout, as stored in `tree.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSeed {
    /// Folders in any order.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Top-level folders in display order.
    #[serde(default)]
    pub root_folder_ids: Vec<FolderId>,
    /// Test cases with no folder.
    #[serde(default)]
    pub unassigned_test_case_ids: Vec<TestCaseId>,
}

/// Pass/fail counts over the test cases directly in a folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderStats {
    /// Number of test cases considered.
    pub total: usize,
    /// Latest run passed.
    pub passed: usize,
    /// Latest run failed.
    pub failed: usize,
    /// Never run, or latest run neither passed nor failed.
    pub not_run: usize,
}

/// The scoped set of test cases to execute for a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRunPlan {
    /// The folder the run was requested for.
    pub folder_id: FolderId,
    /// Test cases in the folder and every descendant folder.
    pub test_case_ids: Vec<TestCaseId>,
    /// Summary for the user.
    pub message: String,
}

/// A row of the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum TreeNode {
    /// A folder row.
    Folder(FolderId),
    /// A test-case row.
    TestCase(TestCaseId),
}
