//! Drag-and-drop payloads carried by tree drop events.

use serde::{Deserialize, Serialize};

/// What kind of tree row is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DragItemKind {
    /// A test-case row.
    TestCase,
    /// A folder row.
    Folder,
}

/// The JSON body attached to a drag event: `{"type", "id", "data"}`.
///
/// `data` is a copy of the dragged record for display purposes and is never
/// trusted for the move itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragPayload {
    /// Row kind.
    #[serde(rename = "type")]
    pub kind: DragItemKind,
    /// Id of the dragged test case or folder.
    pub id: String,
    /// Snapshot of the dragged record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
