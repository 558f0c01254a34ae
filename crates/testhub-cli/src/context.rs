//! Wiring of stores and services for one CLI session.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use testhub_core::config::AppConfig;
use testhub_core::result::AppResult;
use testhub_core::traits::state::StateProvider;
use testhub_entity::issue::Issue;
use testhub_entity::test_case::TestCase;
use testhub_entity::test_run::TestRun;
use testhub_service::{ExecutionService, IssueService, ReportService, TreeService};
use testhub_store::{MemoryEntityStore, SeedData, StateManager};

/// Everything a command needs, built once per process.
///
/// Tree edits live for the lifetime of the session; only the expansion set
/// reaches the state provider.
pub struct Session {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Folder tree commands and queries.
    pub tree: TreeService,
    /// Run recording.
    pub execution: ExecutionService,
    /// Issue workflow.
    pub issues: IssueService,
    /// Pass rates and issue counts.
    pub reports: ReportService,
    /// Test case records, for titles and listings.
    pub test_cases: Arc<MemoryEntityStore<TestCase>>,
}

impl Session {
    /// Loads seed data and builds every service.
    pub async fn open(config: AppConfig) -> AppResult<Self> {
        let seed = SeedData::load(&config.store.seed_dir).await?;
        let latency = Duration::from_millis(config.store.simulated_latency_ms);

        let test_cases =
            Arc::new(MemoryEntityStore::new(seed.test_cases).with_latency(latency));
        let test_runs: Arc<MemoryEntityStore<TestRun>> =
            Arc::new(MemoryEntityStore::new(seed.test_runs).with_latency(latency));
        let issues: Arc<MemoryEntityStore<Issue>> =
            Arc::new(MemoryEntityStore::new(seed.issues).with_latency(latency));

        let state = Arc::new(StateManager::new(&config.state).await?);
        if !state.health_check().await.unwrap_or(false) {
            warn!(
                state_provider = %config.state.provider,
                "State provider is not writable, folder expansion will not persist"
            );
        }
        let tree = TreeService::new(seed.tree, state, test_cases.clone()).await;
        info!(
            seed_dir = %config.store.seed_dir,
            state_provider = %config.state.provider,
            "Session ready"
        );

        Ok(Self {
            execution: ExecutionService::new(test_cases.clone(), test_runs.clone()),
            reports: ReportService::new(test_cases.clone(), test_runs, issues.clone()),
            issues: IssueService::new(issues),
            tree,
            test_cases,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_core::traits::EntityStore;
    use testhub_core::types::FolderId;

    fn bundled_seed_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.seed_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/seed").into();
        config.state.provider = "memory".into();
        config
    }

    #[tokio::test]
    async fn test_bundled_seed_opens_cleanly() {
        let session = Session::open(bundled_seed_config()).await.unwrap();

        assert!(session.tree.integrity_violations().await.is_empty());
        assert_eq!(session.test_cases.get_all().await.unwrap().len(), 6);
        assert_eq!(
            session
                .tree
                .folder_path(&FolderId::new("folder_auth_sso"))
                .await
                .unwrap(),
            vec!["Authentication", "Single Sign-On"]
        );
        assert!(session.tree.is_folder_expanded(&FolderId::new("folder_auth")).await);

        let report = session.reports.summary(None).await.unwrap();
        assert_eq!(report.test_cases, 6);
        assert_eq!(report.test_execution.total, 3);
        assert_eq!(report.issues.total, 1);
    }

    #[tokio::test]
    async fn test_missing_seed_dir_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = bundled_seed_config();
        config.store.seed_dir = dir.path().join("absent").to_string_lossy().into_owned();

        let session = Session::open(config).await.unwrap();
        assert!(session.tree.get_all_folders().await.is_empty());
    }
}
