//! CLI command definitions and dispatch.

pub mod config;
pub mod drop;
pub mod folder;
pub mod issue;
pub mod report;
pub mod shell;
pub mod test_case;
pub mod tree;

use clap::{Parser, Subcommand};

use testhub_core::config::AppConfig;
use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::types::FolderId;

use crate::context::Session;
use crate::output::OutputFormat;

/// TestHub: organise test cases into a folder tree
#[derive(Debug, Parser)]
#[command(name = "testhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// Test case placement and execution
    TestCase(test_case::TestCaseArgs),
    /// Issue reporting and workflow
    Issue(issue::IssueArgs),
    /// Pass rate, coverage and issue counts
    Report(report::ReportArgs),
    /// Render the visible tree
    Tree,
    /// Apply a drag-and-drop payload
    Drop(drop::DropArgs),
    /// Read commands from stdin, one per line, against a single session
    Shell,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: AppConfig) -> AppResult<()> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &app_config, self.format);
        }

        let session = Session::open(app_config).await?;
        match &self.command {
            Commands::Shell => shell::run(&session, self.format).await,
            command => dispatch(command, &session, self.format).await,
        }
    }
}

/// Runs one session-bound command.
pub async fn dispatch(command: &Commands, session: &Session, format: OutputFormat) -> AppResult<()> {
    match command {
        Commands::Folder(args) => folder::execute(args, session, format).await,
        Commands::TestCase(args) => test_case::execute(args, session, format).await,
        Commands::Issue(args) => issue::execute(args, session, format).await,
        Commands::Report(args) => report::execute(args, session, format).await,
        Commands::Tree => tree::execute(session, format).await,
        Commands::Drop(args) => drop::execute(args, session, format).await,
        Commands::Config(args) => config::execute(args, &session.config, format),
        Commands::Shell => Err(AppError::validation("The shell cannot be nested")),
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load(config_path)
}

/// Helper: turn an optional `--to`/`--target` argument into a folder id.
///
/// `root` (or an absent argument) means no folder.
pub fn target_folder(arg: Option<&str>) -> Option<FolderId> {
    arg.filter(|value| !value.eq_ignore_ascii_case("root"))
        .map(FolderId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_folder() {
        assert_eq!(target_folder(None), None);
        assert_eq!(target_folder(Some("root")), None);
        assert_eq!(target_folder(Some("f1")), Some(FolderId::new("f1")));
    }

    #[test]
    fn test_cli_parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "testhub", "--format", "json", "folder", "move", "f1", "--to", "f2",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Folder(_)));

        let cli = Cli::try_parse_from(["testhub", "drop", "--payload", "{}"]).unwrap();
        assert!(matches!(cli.command, Commands::Drop(_)));

        let cli = Cli::try_parse_from(["testhub", "report", "--days", "30"]).unwrap();
        assert!(matches!(cli.command, Commands::Report(ref args) if args.days == Some(30)));

        let cli = Cli::try_parse_from([
            "testhub", "test-case", "create", "Guest checkout", "--step", "Open cart", "--step",
            "Pay", "--priority", "high", "--folder", "f1",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::TestCase(_)));
    }
}
