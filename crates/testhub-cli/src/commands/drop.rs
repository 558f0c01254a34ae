//! Drag-and-drop CLI command.

use clap::Args;

use testhub_core::result::AppResult;
use testhub_service::DropCommand;

use crate::context::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the drop command
#[derive(Debug, Args)]
pub struct DropArgs {
    /// Raw drag payload, e.g. '{"type":"testCase","id":"tc_1"}'
    #[arg(short, long)]
    pub payload: String,
    /// Folder the item is dropped on (`root` or omit for the top level)
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Execute the drop command
pub async fn execute(args: &DropArgs, session: &Session, format: OutputFormat) -> AppResult<()> {
    let target = super::target_folder(args.target.as_deref());
    let command = session.tree.handle_drop(&args.payload, target.as_ref()).await?;

    let destination = target.map_or_else(|| "root".to_string(), |t| t.to_string());
    let (kind, id) = match &command {
        DropCommand::MoveTestCase(id) => ("testCase", id.to_string()),
        DropCommand::MoveFolder(id) => ("folder", id.to_string()),
    };
    output::print_result(
        &serde_json::json!({"type": kind, "id": id, "target": destination}),
        &format!("Dropped {kind} {id} on {destination}"),
        format,
    );
    Ok(())
}
