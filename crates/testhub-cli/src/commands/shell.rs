//! Line-oriented shell: many commands against one session.
//!
//! Every command a one-shot invocation accepts is available here, so tree
//! edits made on one line are visible on the next.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use testhub_core::error::AppError;
use testhub_core::result::AppResult;

use super::Commands;
use crate::context::Session;
use crate::output::{self, OutputFormat};

/// One shell line, parsed like the command line minus the binary name.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    /// Command to run
    #[command(subcommand)]
    command: Commands,
}

/// Reads commands from stdin until EOF, `exit` or `quit`.
///
/// A failing command prints its error and the shell carries on.
pub async fn run(session: &Session, format: OutputFormat) -> AppResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                output::print_error(&e.to_string());
                continue;
            }
        };

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => {
                if let Err(e) = super::dispatch(&parsed.command, session, format).await {
                    output::print_error(&e.to_string());
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    Ok(())
}

/// Splits a line into words with POSIX shell quoting rules.
fn split_words(line: &str) -> AppResult<Vec<String>> {
    shlex::split(line).ok_or_else(|| AppError::validation("Unterminated quote"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_quotes() {
        let words = split_words(r#"drop --payload '{"type": "folder", "id": "f1"}' --target f2"#)
            .unwrap();
        assert_eq!(
            words,
            vec![
                "drop",
                "--payload",
                r#"{"type": "folder", "id": "f1"}"#,
                "--target",
                "f2"
            ]
        );

        let words = split_words(r#"folder create "Edge Cases" --parent f1"#).unwrap();
        assert_eq!(words, vec!["folder", "create", "Edge Cases", "--parent", "f1"]);

        assert_eq!(split_words(r#"folder rename f1 """#).unwrap(), vec!["folder", "rename", "f1", ""]);
        assert!(split_words("folder create 'open").is_err());
    }

    #[test]
    fn test_split_words_backslash_escapes() {
        let words =
            split_words(r#"drop --payload "{\"type\":\"folder\",\"id\":\"f1\"}""#).unwrap();
        assert_eq!(words, vec!["drop", "--payload", r#"{"type":"folder","id":"f1"}"#]);

        let words = split_words(r"folder create Edge\ Cases").unwrap();
        assert_eq!(words, vec!["folder", "create", "Edge Cases"]);
    }

    #[test]
    fn test_shell_line_parses_commands() {
        let parsed = ShellLine::try_parse_from(["folder", "toggle", "f1"]).unwrap();
        assert!(matches!(parsed.command, Commands::Folder(_)));
        assert!(ShellLine::try_parse_from(["bogus"]).is_err());
    }
}
