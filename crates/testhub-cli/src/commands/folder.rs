//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::types::FolderId;
use testhub_entity::folder::{CreateFolder, Folder, UpdateFolder};

use crate::context::Session;
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List every folder
    List,
    /// Show one folder
    Show {
        /// Folder ID
        id: String,
    },
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: String,
        /// New name
        name: String,
    },
    /// Delete a folder; its children and test cases move up
    Delete {
        /// Folder ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a folder under another folder, or to the root
    Move {
        /// Folder ID
        id: String,
        /// Target folder ID (`root` or omit for the top level)
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Print the breadcrumb path of a folder
    Path {
        /// Folder ID
        id: String,
    },
    /// Pass/fail counts of a folder's direct test cases
    Stats {
        /// Folder ID
        id: String,
    },
    /// Start every test case in a folder and its subfolders
    Run {
        /// Folder ID
        id: String,
    },
    /// Flip a folder between expanded and collapsed
    Toggle {
        /// Folder ID
        id: String,
    },
    /// Expand a folder
    Expand {
        /// Folder ID
        id: String,
    },
    /// Collapse a folder
    Collapse {
        /// Folder ID
        id: String,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent
    parent: String,
    /// Direct test cases
    test_cases: usize,
    /// Child folders
    children: usize,
    /// Expanded
    expanded: bool,
    /// Updated at
    updated_at: String,
}

impl FolderRow {
    fn new(folder: &Folder, expanded: bool) -> Self {
        Self {
            id: folder.id.to_string(),
            name: folder.name.clone(),
            parent: folder
                .parent_id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            test_cases: folder.test_case_ids.len(),
            children: folder.child_folder_ids.len(),
            expanded,
            updated_at: folder.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, session: &Session, format: OutputFormat) -> AppResult<()> {
    let tree = &session.tree;

    match &args.command {
        FolderCommand::List => {
            let snapshot = tree.get_tree_structure().await;
            let rows: Vec<FolderRow> = snapshot
                .folders
                .values()
                .map(|f| FolderRow::new(f, snapshot.is_expanded(&f.id)))
                .collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Show { id } => {
            let id = FolderId::new(id);
            let folder = tree.get_folder_by_id(&id).await?;
            match format {
                OutputFormat::Json => output::print_json(&folder),
                OutputFormat::Table => {
                    let path = tree.folder_path(&id).await?;
                    output::print_kv("ID", folder.id.as_str());
                    output::print_kv("Name", &folder.name);
                    output::print_kv("Path", &path.join(" / "));
                    output::print_kv("Test cases", &folder.test_case_ids.len().to_string());
                    output::print_kv("Child folders", &folder.child_folder_ids.len().to_string());
                    output::print_kv("Expanded", &tree.is_folder_expanded(&id).await.to_string());
                    output::print_kv("Created", &folder.created_at.to_rfc3339());
                    output::print_kv("Updated", &folder.updated_at.to_rfc3339());
                }
            }
        }
        FolderCommand::Create { name, parent } => {
            let folder = tree
                .create_folder(CreateFolder {
                    name: name.clone(),
                    parent_id: parent.as_deref().map(FolderId::new),
                })
                .await?;
            output::print_result(
                &folder,
                &format!("Folder '{}' created (id: {})", folder.name, folder.id),
                format,
            );
        }
        FolderCommand::Rename { id, name } => {
            let folder = tree
                .update_folder(&FolderId::new(id), UpdateFolder::rename(name.as_str()))
                .await?;
            output::print_result(&folder, &format!("Folder renamed to '{}'", folder.name), format);
        }
        FolderCommand::Delete { id, yes } => {
            let id = FolderId::new(id);
            let folder = tree.get_folder_by_id(&id).await?;

            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete folder '{}'? {} subfolder(s) and {} test case(s) will move up.",
                        folder.name,
                        folder.child_folder_ids.len(),
                        folder.test_case_ids.len()
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = tree.delete_folder(&id).await?;
            output::print_result(&removed, &format!("Folder '{}' deleted", removed.name), format);
        }
        FolderCommand::Move { id, to } => {
            let target = super::target_folder(to.as_deref());
            let folder = tree
                .move_folder_to_folder(&FolderId::new(id), target.as_ref())
                .await?;
            let destination = target.map_or_else(|| "root".to_string(), |t| t.to_string());
            output::print_result(
                &folder,
                &format!("Folder '{}' moved to {destination}", folder.name),
                format,
            );
        }
        FolderCommand::Path { id } => {
            let path = tree.folder_path(&FolderId::new(id)).await?;
            match format {
                OutputFormat::Table => println!("{}", path.join(" / ")),
                OutputFormat::Json => output::print_json(&path),
            }
        }
        FolderCommand::Stats { id } => {
            let stats = tree.folder_stats(&FolderId::new(id)).await?;
            match format {
                OutputFormat::Table => {
                    output::print_kv("Total", &stats.total.to_string());
                    output::print_kv("Passed", &stats.passed.to_string());
                    output::print_kv("Failed", &stats.failed.to_string());
                    output::print_kv("Not run", &stats.not_run.to_string());
                }
                OutputFormat::Json => output::print_json(&stats),
            }
        }
        FolderCommand::Run { id } => {
            let plan = tree.run_all_tests_in_folder(&FolderId::new(id)).await?;
            if plan.test_case_ids.is_empty() && format == OutputFormat::Table {
                output::print_warning("Folder contains no test cases");
            }
            output::print_result(&plan, &plan.message, format);
        }
        FolderCommand::Toggle { id } => {
            let id = FolderId::new(id);
            let expanded = tree.toggle_folder_expanded(&id).await;
            print_expansion(&id, expanded, format);
        }
        FolderCommand::Expand { id } => {
            let id = FolderId::new(id);
            let expanded = tree.set_folder_expanded(&id, true).await;
            print_expansion(&id, expanded, format);
        }
        FolderCommand::Collapse { id } => {
            let id = FolderId::new(id);
            let expanded = tree.set_folder_expanded(&id, false).await;
            print_expansion(&id, expanded, format);
        }
    }

    Ok(())
}

fn print_expansion(id: &FolderId, expanded: bool, format: OutputFormat) {
    let state = if expanded { "expanded" } else { "collapsed" };
    output::print_result(
        &serde_json::json!({"folderId": id, "expanded": expanded}),
        &format!("Folder {id} {state}"),
        format,
    );
}
