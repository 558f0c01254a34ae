//! Seed data loading.
//!
//! A seed directory holds up to four JSON files. Any file may be absent, in
//! which case its collection starts empty.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use testhub_core::error::{AppError, ErrorKind};
use testhub_core::result::AppResult;
use testhub_entity::folder::TreeSeed;
use testhub_entity::issue::Issue;
use testhub_entity::test_case::TestCase;
use testhub_entity::test_run::TestRun;

/// File holding the folder tree layout.
pub const TREE_FILE: &str = "tree.json";
/// File holding the test case array.
pub const TEST_CASES_FILE: &str = "testCases.json";
/// File holding the issue array.
pub const ISSUES_FILE: &str = "issues.json";
/// File holding the test run array.
pub const TEST_RUNS_FILE: &str = "testRuns.json";

/// Everything needed to start a session.
#[derive(Debug, Clone, Default)]
pub struct SeedData {
    /// Folder tree layout.
    pub tree: TreeSeed,
    /// Test cases.
    pub test_cases: Vec<TestCase>,
    /// Issues.
    pub issues: Vec<Issue>,
    /// Test runs.
    pub test_runs: Vec<TestRun>,
}

impl SeedData {
    /// Load every seed file from a directory.
    pub async fn load(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();
        let seed = Self {
            tree: read_optional(dir, TREE_FILE).await?.unwrap_or_default(),
            test_cases: read_optional(dir, TEST_CASES_FILE).await?.unwrap_or_default(),
            issues: read_optional(dir, ISSUES_FILE).await?.unwrap_or_default(),
            test_runs: read_optional(dir, TEST_RUNS_FILE).await?.unwrap_or_default(),
        };

        info!(
            dir = %dir.display(),
            folders = seed.tree.folders.len(),
            test_cases = seed.test_cases.len(),
            issues = seed.issues.len(),
            test_runs = seed.test_runs.len(),
            "Seed data loaded"
        );
        Ok(seed)
    }
}

async fn read_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> AppResult<Option<T>> {
    let path = dir.join(file);
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Seed file absent");
            return Ok(None);
        }
        Err(e) => {
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read seed file '{}'", path.display()),
                e,
            ));
        }
    };

    serde_json::from_str(&contents).map(Some).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Invalid seed file '{}': {e}", path.display()),
            e,
        )
    })
}
