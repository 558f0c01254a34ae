//! Read-only views derived from a tree snapshot.
//!
//! Everything here is a pure function of its arguments. Walks are bounded by
//! the folder count or guarded by a visited set, so a malformed tree (a
//! hand-edited seed with a cycle, say) yields a truncated answer rather than
//! a hang.

use std::collections::{HashMap, HashSet};

use testhub_core::types::{FolderId, TestCaseId};
use testhub_entity::folder::{Folder, FolderStats, TreeNode, TreeStructure};
use testhub_entity::test_case::{RunStatus, TestCase};

/// The test cases directly in a folder, in the folder's order.
///
/// Ids with no matching test case are skipped.
pub fn test_cases_in_folder(folder: &Folder, test_cases: &[TestCase]) -> Vec<TestCase> {
    let by_id: HashMap<&TestCaseId, &TestCase> =
        test_cases.iter().map(|tc| (&tc.id, tc)).collect();

    folder
        .test_case_ids
        .iter()
        .filter_map(|id| by_id.get(id).map(|tc| (*tc).clone()))
        .collect()
}

/// Every test-case id in a folder and all of its descendants.
///
/// The folder's own ids come first, followed by each child subtree in
/// `child_folder_ids` order. Unknown folders yield an empty list.
pub fn subtree_test_case_ids(tree: &TreeStructure, folder_id: &FolderId) -> Vec<TestCaseId> {
    let mut ids = Vec::new();
    let mut visited = HashSet::new();
    collect_subtree(tree, folder_id, &mut visited, &mut ids);
    ids
}

fn collect_subtree<'a>(
    tree: &'a TreeStructure,
    folder_id: &'a FolderId,
    visited: &mut HashSet<&'a FolderId>,
    out: &mut Vec<TestCaseId>,
) {
    let Some(folder) = tree.folder(folder_id) else {
        return;
    };
    if !visited.insert(folder_id) {
        return;
    }

    out.extend(folder.test_case_ids.iter().cloned());
    for child_id in &folder.child_folder_ids {
        collect_subtree(tree, child_id, visited, out);
    }
}

/// Pass/fail counts over the test cases directly in a folder.
///
/// Blocked and never-run test cases count as not run.
pub fn folder_stats(
    tree: &TreeStructure,
    folder_id: &FolderId,
    test_cases: &[TestCase],
) -> FolderStats {
    let Some(folder) = tree.folder(folder_id) else {
        return FolderStats::default();
    };

    test_cases_in_folder(folder, test_cases)
        .iter()
        .fold(FolderStats::default(), |mut stats, tc| {
            stats.total += 1;
            match tc.last_run_status {
                Some(RunStatus::Passed) => stats.passed += 1,
                Some(RunStatus::Failed) => stats.failed += 1,
                Some(RunStatus::Blocked) | None => stats.not_run += 1,
            }
            stats
        })
}

/// Folder names from the root down to `folder_id`, inclusive.
pub fn folder_path(tree: &TreeStructure, folder_id: &FolderId) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = tree.folder(folder_id);

    while let Some(folder) = current {
        if names.len() > tree.folder_count() {
            break;
        }
        names.push(folder.name.clone());
        current = folder.parent_id.as_ref().and_then(|id| tree.folder(id));
    }

    names.reverse();
    names
}

/// Whether `ancestor_id` appears strictly above `candidate_id`.
pub fn is_descendant(tree: &TreeStructure, candidate_id: &FolderId, ancestor_id: &FolderId) -> bool {
    let mut current = tree.folder(candidate_id).and_then(|f| f.parent_id.as_ref());
    let mut steps = 0;

    while let Some(id) = current {
        if id == ancestor_id {
            return true;
        }
        steps += 1;
        if steps > tree.folder_count() {
            return false;
        }
        current = tree.folder(id).and_then(|f| f.parent_id.as_ref());
    }

    false
}

/// The rows of the rendered tree, top to bottom.
///
/// Each root folder appears in order; an expanded folder is followed by its
/// test cases and then its child folders, recursively. Unassigned test cases
/// close the list.
pub fn visible_node_order(tree: &TreeStructure) -> Vec<TreeNode> {
    let mut nodes = Vec::new();
    let mut visited = HashSet::new();

    for root_id in &tree.root_folder_ids {
        push_visible(tree, root_id, &mut visited, &mut nodes);
    }
    nodes.extend(
        tree.unassigned_test_case_ids
            .iter()
            .cloned()
            .map(TreeNode::TestCase),
    );
    nodes
}

fn push_visible<'a>(
    tree: &'a TreeStructure,
    folder_id: &'a FolderId,
    visited: &mut HashSet<&'a FolderId>,
    out: &mut Vec<TreeNode>,
) {
    let Some(folder) = tree.folder(folder_id) else {
        return;
    };
    if !visited.insert(folder_id) {
        return;
    }

    out.push(TreeNode::Folder(folder_id.clone()));
    if !tree.is_expanded(folder_id) {
        return;
    }

    out.extend(folder.test_case_ids.iter().cloned().map(TreeNode::TestCase));
    for child_id in &folder.child_folder_ids {
        push_visible(tree, child_id, visited, out);
    }
}

/// Depth of every visible row, for indentation.
pub fn visible_depths(tree: &TreeStructure) -> Vec<(TreeNode, usize)> {
    visible_node_order(tree)
        .into_iter()
        .map(|node| {
            let depth = match &node {
                TreeNode::Folder(id) => folder_path(tree, id).len().saturating_sub(1),
                TreeNode::TestCase(_) => parent_folder_of(tree, &node)
                    .map(|parent| folder_path(tree, &parent).len())
                    .unwrap_or(0),
            };
            (node, depth)
        })
        .collect()
}

/// The row after `node`, if any.
pub fn next_visible(tree: &TreeStructure, node: &TreeNode) -> Option<TreeNode> {
    let nodes = visible_node_order(tree);
    let index = nodes.iter().position(|n| n == node)?;
    nodes.get(index + 1).cloned()
}

/// The row before `node`, if any.
pub fn previous_visible(tree: &TreeStructure, node: &TreeNode) -> Option<TreeNode> {
    let nodes = visible_node_order(tree);
    let index = nodes.iter().position(|n| n == node)?;
    index.checked_sub(1).and_then(|i| nodes.get(i).cloned())
}

/// The folder directly containing `node`.
pub fn parent_folder_of(tree: &TreeStructure, node: &TreeNode) -> Option<FolderId> {
    match node {
        TreeNode::Folder(id) => tree.folder(id).and_then(|f| f.parent_id.clone()),
        TreeNode::TestCase(id) => tree
            .folders
            .values()
            .find(|f| f.contains_test_case(id))
            .map(|f| f.id.clone()),
    }
}

/// The first child folder of `folder_id`.
pub fn first_child_folder(tree: &TreeStructure, folder_id: &FolderId) -> Option<FolderId> {
    tree.folder(folder_id)
        .and_then(|f| f.child_folder_ids.first().cloned())
}
