//! Drag-and-drop payload decoding.

use serde_json::Value;
use testhub_core::error::{AppError, ErrorKind};
use testhub_core::result::AppResult;
use testhub_core::types::{FolderId, TestCaseId};
use testhub_entity::folder::{DragItemKind, DragPayload};

/// The move a drop event asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropCommand {
    /// Move a test case.
    MoveTestCase(TestCaseId),
    /// Move a folder.
    MoveFolder(FolderId),
}

/// Decodes the raw JSON attached to a drag event.
///
/// Only a JSON object is accepted; serde would otherwise also take the
/// positional `["folder", "id"]` form.
pub fn parse_drag_payload(raw: &str) -> AppResult<DropCommand> {
    let value: Value = serde_json::from_str(raw).map_err(malformed)?;
    if !value.is_object() {
        return Err(AppError::malformed_payload(
            "Drag payload must be a JSON object",
        ));
    }
    let payload: DragPayload = serde_json::from_value(value).map_err(malformed)?;

    let id = payload.id.trim();
    if id.is_empty() {
        return Err(AppError::malformed_payload("Drag payload has an empty id"));
    }

    Ok(match payload.kind {
        DragItemKind::TestCase => DropCommand::MoveTestCase(TestCaseId::new(id)),
        DragItemKind::Folder => DropCommand::MoveFolder(FolderId::new(id)),
    })
}

fn malformed(e: serde_json::Error) -> AppError {
    AppError::with_source(
        ErrorKind::MalformedPayload,
        format!("Invalid drag payload: {e}"),
        e,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_test_case_payload() {
        let raw = r#"{"type": "testCase", "id": "tc_1", "data": {"title": "Login"}}"#;
        assert_eq!(
            parse_drag_payload(raw).unwrap(),
            DropCommand::MoveTestCase(TestCaseId::new("tc_1"))
        );
    }

    #[test]
    fn test_parses_folder_payload_without_data() {
        let raw = r#"{"type": "folder", "id": "folder_7"}"#;
        assert_eq!(
            parse_drag_payload(raw).unwrap(),
            DropCommand::MoveFolder(FolderId::new("folder_7"))
        );
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        for raw in [
            "not json",
            r#"{"type": "issue", "id": "issue_1"}"#,
            r#"{"type": "folder"}"#,
            r#"{"type": "folder", "id": "  "}"#,
            r#"["folder", "f1"]"#,
            r#"["testCase", "tc_1", null]"#,
            r#""folder""#,
            "null",
        ] {
            let err = parse_drag_payload(raw).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MalformedPayload, "payload: {raw}");
        }
    }
}
