//! Rendering of the visible folder tree.

use std::collections::HashMap;

use serde::Serialize;

use testhub_core::result::AppResult;
use testhub_core::traits::EntityStore;
use testhub_entity::folder::{TreeNode, TreeStructure};
use testhub_entity::test_case::{RunStatus, TestCase};
use testhub_service::folder::projection;

use crate::context::Session;
use crate::output::{self, OutputFormat};

/// One rendered row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeLine {
    /// Folder or test case.
    node: TreeNode,
    /// Nesting level, zero for roots.
    depth: usize,
    /// Display text.
    label: String,
}

/// Execute the tree command
pub async fn execute(session: &Session, format: OutputFormat) -> AppResult<()> {
    let snapshot = session.tree.get_tree_structure().await;
    let test_cases = session.test_cases.get_all().await?;
    let lines = render(&snapshot, &test_cases);

    match format {
        OutputFormat::Json => output::print_json(&lines),
        OutputFormat::Table => {
            if lines.is_empty() {
                println!("(empty tree)");
            }
            for line in &lines {
                println!("{}{}", "  ".repeat(line.depth), line.label);
            }
        }
    }
    Ok(())
}

fn render(tree: &TreeStructure, test_cases: &[TestCase]) -> Vec<TreeLine> {
    let titles: HashMap<&str, &TestCase> =
        test_cases.iter().map(|tc| (tc.id.as_str(), tc)).collect();

    projection::visible_depths(tree)
        .into_iter()
        .map(|(node, depth)| {
            let label = match &node {
                TreeNode::Folder(id) => {
                    let name = tree.folder(id).map_or("?", |f| f.name.as_str());
                    let marker = if tree.is_expanded(id) { "▾" } else { "▸" };
                    let stats = projection::folder_stats(tree, id, test_cases);
                    format!(
                        "{marker} {name} [{id}] ({} total, {} passed, {} failed, {} not run)",
                        stats.total, stats.passed, stats.failed, stats.not_run
                    )
                }
                TreeNode::TestCase(id) => match titles.get(id.as_str()) {
                    Some(tc) => format!(
                        "• {} [{id}] {}",
                        tc.title,
                        RunStatus::label(tc.last_run_status)
                    ),
                    None => format!("• [{id}]"),
                },
            };
            TreeLine { node, depth, label }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_core::types::{FolderId, TestCaseId};

    #[test]
    fn test_render_indents_and_labels() {
        let tree: TreeStructure = serde_json::from_value(serde_json::json!({
            "folders": {
                "f1": {"id": "f1", "name": "Auth", "testCaseIds": ["tc_1"]}
            },
            "rootFolderIds": ["f1"],
            "unassignedTestCaseIds": ["tc_2"],
            "expandedState": ["f1"]
        }))
        .unwrap();
        let cases: Vec<TestCase> = serde_json::from_value(serde_json::json!([
            {"id": "tc_1", "title": "Valid login", "lastRunStatus": "passed"}
        ]))
        .unwrap();

        let lines = render(&tree, &cases);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].node, TreeNode::Folder(FolderId::new("f1")));
        assert!(lines[0].label.contains("1 passed"));
        assert_eq!(lines[1].depth, 1);
        assert!(lines[1].label.contains("Valid login"));
        assert_eq!(lines[2].node, TreeNode::TestCase(TestCaseId::new("tc_2")));
        assert_eq!(lines[2].label, "• [tc_2]");
    }
}
