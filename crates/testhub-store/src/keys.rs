//! State key builders for all TestHub persisted UI state.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Prefix applied to all TestHub state keys.
const PREFIX: &str = "testhub";

/// Key for the set of expanded folder ids in the test-case tree.
///
/// Stored independently of the folder data itself.
pub fn tree_expanded_state() -> String {
    format!("{PREFIX}:treeExpandedState")
}
