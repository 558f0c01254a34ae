//! Async command API over the folder tree engine.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::traits::{EntityStore, StateProvider};
use testhub_core::types::{FolderId, TestCaseId};
use testhub_entity::folder::{
    CreateFolder, Folder, FolderRunPlan, FolderStats, TreeNode, TreeSeed, TreeStructure,
    UpdateFolder,
};
use testhub_entity::test_case::{CreateTestCase, TestCase};
use testhub_store::StateManager;
use testhub_store::keys;

use super::drag::{DropCommand, parse_drag_payload};
use super::engine::FolderTreeEngine;
use super::projection;

/// Owns one folder tree and serializes every command against it.
///
/// Each command holds the write lock for its whole duration, so commands
/// never interleave. Expansion changes are mirrored to the state provider
/// on a best-effort basis.
pub struct TreeService {
    /// The tree itself.
    engine: RwLock<FolderTreeEngine>,
    /// Where the expansion set is persisted.
    state: Arc<StateManager>,
    /// Test case records, for stats and listings.
    test_cases: Arc<dyn EntityStore<TestCase>>,
}

impl std::fmt::Debug for TreeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeService")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TreeService {
    /// Creates a tree service from a seed layout.
    ///
    /// A previously saved expansion set replaces the seed's expansion hints.
    /// If the saved set cannot be read, every folder starts collapsed.
    pub async fn new(
        seed: TreeSeed,
        state: Arc<StateManager>,
        test_cases: Arc<dyn EntityStore<TestCase>>,
    ) -> Self {
        let mut engine = FolderTreeEngine::from_seed(seed);

        match state
            .get_json::<Vec<FolderId>>(&keys::tree_expanded_state())
            .await
        {
            Ok(Some(saved)) => {
                debug!(expanded = saved.len(), "Restored saved expansion state");
                engine.restore_expanded(saved);
            }
            Ok(None) => debug!("No saved expansion state, using folder defaults"),
            Err(e) => {
                warn!(error = %e, "Saved expansion state unreadable, starting collapsed");
                engine.restore_expanded(Vec::new());
            }
        }

        Self {
            engine: RwLock::new(engine),
            state,
            test_cases,
        }
    }

    /// Independent copy of the current tree.
    pub async fn get_tree_structure(&self) -> TreeStructure {
        self.engine.read().await.snapshot()
    }

    /// Gets a folder by ID.
    pub async fn get_folder_by_id(&self, id: &FolderId) -> AppResult<Folder> {
        self.engine.read().await.get_folder_by_id(id)
    }

    /// Every folder, ordered by id.
    pub async fn get_all_folders(&self) -> Vec<Folder> {
        self.engine.read().await.all_folders()
    }

    /// Creates a new folder.
    pub async fn create_folder(&self, req: CreateFolder) -> AppResult<Folder> {
        let mut engine = self.engine.write().await;
        let folder = engine.create_folder(req)?;

        info!(
            folder_id = %folder.id,
            name = %folder.name,
            parent_id = ?folder.parent_id.as_ref().map(FolderId::as_str),
            "Folder created"
        );

        self.save_expansion(&engine).await;
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn update_folder(&self, id: &FolderId, updates: UpdateFolder) -> AppResult<Folder> {
        let folder = self.engine.write().await.update_folder(id, updates)?;
        info!(folder_id = %id, name = %folder.name, "Folder updated");
        Ok(folder)
    }

    /// Deletes a folder, promoting its children and unassigning its test cases.
    pub async fn delete_folder(&self, id: &FolderId) -> AppResult<Folder> {
        let mut engine = self.engine.write().await;
        let folder = engine.delete_folder(id)?;

        info!(
            folder_id = %id,
            promoted_children = folder.child_folder_ids.len(),
            unassigned_test_cases = folder.test_case_ids.len(),
            "Folder deleted"
        );

        self.save_expansion(&engine).await;
        Ok(folder)
    }

    /// Places a test case in a folder, or unassigns it.
    pub async fn move_test_case_to_folder(
        &self,
        test_case_id: &TestCaseId,
        target: Option<&FolderId>,
    ) -> AppResult<()> {
        self.engine
            .write()
            .await
            .move_test_case_to_folder(test_case_id, target)?;

        info!(
            test_case_id = %test_case_id,
            target = ?target.map(FolderId::as_str),
            "Test case moved"
        );
        Ok(())
    }

    /// Stores a new test case and places it in `folder`, or among the
    /// unassigned test cases.
    ///
    /// The folder is checked before anything is stored, so a NotFound leaves
    /// both the store and the tree unchanged.
    pub async fn create_test_case(
        &self,
        req: CreateTestCase,
        folder: Option<&FolderId>,
    ) -> AppResult<TestCase> {
        if req.title.trim().is_empty() {
            return Err(AppError::validation("Test case title cannot be empty"));
        }

        let mut engine = self.engine.write().await;
        if let Some(folder) = folder {
            engine.get_folder_by_id(folder)?;
        }
        let test_case = self.test_cases.create(req).await?;
        engine.move_test_case_to_folder(&test_case.id, folder)?;

        info!(
            test_case_id = %test_case.id,
            folder_id = ?folder.map(FolderId::as_str),
            "Test case created"
        );
        Ok(test_case)
    }

    /// Reparents a folder, or moves it to the root.
    pub async fn move_folder_to_folder(
        &self,
        folder_id: &FolderId,
        target: Option<&FolderId>,
    ) -> AppResult<Folder> {
        let folder = self
            .engine
            .write()
            .await
            .move_folder_to_folder(folder_id, target)?;

        info!(
            folder_id = %folder_id,
            target = ?target.map(FolderId::as_str),
            "Folder moved"
        );
        Ok(folder)
    }

    /// Flips a folder's expansion.
    pub async fn toggle_folder_expanded(&self, id: &FolderId) -> bool {
        let mut engine = self.engine.write().await;
        let expanded = engine.toggle_folder_expanded(id);
        debug!(folder_id = %id, expanded, "Folder expansion toggled");
        self.save_expansion(&engine).await;
        expanded
    }

    /// Sets a folder's expansion.
    pub async fn set_folder_expanded(&self, id: &FolderId, expanded: bool) -> bool {
        let mut engine = self.engine.write().await;
        let expanded = engine.set_folder_expanded(id, expanded);
        debug!(folder_id = %id, expanded, "Folder expansion set");
        self.save_expansion(&engine).await;
        expanded
    }

    /// Whether a folder is currently expanded.
    pub async fn is_folder_expanded(&self, id: &FolderId) -> bool {
        self.engine.read().await.is_folder_expanded(id)
    }

    /// The test cases directly in a folder, in display order.
    pub async fn test_cases_in_folder(&self, id: &FolderId) -> AppResult<Vec<TestCase>> {
        let folder = self.get_folder_by_id(id).await?;
        let test_cases = self.test_cases.get_all().await?;
        Ok(projection::test_cases_in_folder(&folder, &test_cases))
    }

    /// Test cases not placed in any folder.
    pub async fn unassigned_test_cases(&self) -> AppResult<Vec<TestCase>> {
        let ids = self.engine.read().await.tree().unassigned_test_case_ids.clone();
        let test_cases = self.test_cases.get_all().await?;
        Ok(ids
            .iter()
            .filter_map(|id| test_cases.iter().find(|tc| &tc.id == id).cloned())
            .collect())
    }

    /// The folder holding a test case; `None` when unassigned or never placed.
    pub async fn folder_of_test_case(&self, test_case_id: &TestCaseId) -> Option<FolderId> {
        self.engine
            .read()
            .await
            .location_of(test_case_id)
            .flatten()
            .cloned()
    }

    /// Every test-case id in a folder's subtree.
    pub async fn subtree_test_case_ids(&self, id: &FolderId) -> Vec<TestCaseId> {
        projection::subtree_test_case_ids(self.engine.read().await.tree(), id)
    }

    /// Collects every test case under a folder for execution.
    pub async fn run_all_tests_in_folder(&self, id: &FolderId) -> AppResult<FolderRunPlan> {
        let engine = self.engine.read().await;
        engine.get_folder_by_id(id)?;
        let test_case_ids = projection::subtree_test_case_ids(engine.tree(), id);
        drop(engine);

        let message = format!("Started execution of {} test cases", test_case_ids.len());
        info!(folder_id = %id, count = test_case_ids.len(), "Folder run started");

        Ok(FolderRunPlan {
            folder_id: id.clone(),
            test_case_ids,
            message,
        })
    }

    /// Pass/fail counts over a folder's direct test cases.
    pub async fn folder_stats(&self, id: &FolderId) -> AppResult<FolderStats> {
        let tree = self.get_tree_structure().await;
        if !tree.contains_folder(id) {
            return Err(AppError::not_found(format!("Folder not found: {id}")));
        }
        let test_cases = self.test_cases.get_all().await?;
        Ok(projection::folder_stats(&tree, id, &test_cases))
    }

    /// Folder names from the root down to a folder.
    pub async fn folder_path(&self, id: &FolderId) -> AppResult<Vec<String>> {
        let engine = self.engine.read().await;
        engine.get_folder_by_id(id)?;
        Ok(projection::folder_path(engine.tree(), id))
    }

    /// Rows of the rendered tree, top to bottom.
    pub async fn visible_nodes(&self) -> Vec<TreeNode> {
        projection::visible_node_order(self.engine.read().await.tree())
    }

    /// Applies a drop event: decodes the payload and performs the move.
    pub async fn handle_drop(
        &self,
        raw_payload: &str,
        target: Option<&FolderId>,
    ) -> AppResult<DropCommand> {
        let command = parse_drag_payload(raw_payload).inspect_err(|e| {
            warn!(error = %e, "Rejected drop with malformed payload");
        })?;

        match &command {
            DropCommand::MoveTestCase(id) => self.move_test_case_to_folder(id, target).await?,
            DropCommand::MoveFolder(id) => {
                self.move_folder_to_folder(id, target).await?;
            }
        }
        Ok(command)
    }

    /// Every broken tree invariant. Empty when healthy.
    pub async fn integrity_violations(&self) -> Vec<String> {
        self.engine.read().await.integrity_violations()
    }

    async fn save_expansion(&self, engine: &FolderTreeEngine) {
        let expanded = engine.expanded_ids();
        if let Err(e) = self
            .state
            .set_json(&keys::tree_expanded_state(), &expanded)
            .await
        {
            warn!(error = %e, "Failed to save expansion state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_core::config::state::MemoryStateConfig;
    use testhub_core::error::ErrorKind;
    use testhub_store::MemoryEntityStore;
    use testhub_store::state::MemoryStateProvider;

    async fn service(seed: TreeSeed) -> (TreeService, Arc<StateManager>) {
        let provider = Arc::new(MemoryStateProvider::new(&MemoryStateConfig::default()));
        let state = Arc::new(StateManager::from_provider(provider));
        let store: Arc<dyn EntityStore<TestCase>> = Arc::new(MemoryEntityStore::empty());
        (TreeService::new(seed, state.clone(), store).await, state)
    }

    #[tokio::test]
    async fn test_create_persists_expansion() {
        let (service, state) = service(TreeSeed::default()).await;
        let folder = service
            .create_folder(CreateFolder {
                name: "Login".into(),
                parent_id: None,
            })
            .await
            .unwrap();

        let saved: Option<Vec<FolderId>> =
            state.get_json(&keys::tree_expanded_state()).await.unwrap();
        assert_eq!(saved, Some(vec![folder.id.clone()]));

        assert!(!service.toggle_folder_expanded(&folder.id).await);
        let saved: Option<Vec<FolderId>> =
            state.get_json(&keys::tree_expanded_state()).await.unwrap();
        assert_eq!(saved, Some(vec![]));
    }

    /// Reads nothing and rejects every write.
    #[derive(Debug)]
    struct ReadOnlyState;

    #[async_trait::async_trait]
    impl StateProvider for ReadOnlyState {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> AppResult<()> {
            Err(AppError::new(ErrorKind::Storage, "read-only"))
        }

        async fn delete(&self, _key: &str) -> AppResult<()> {
            Err(AppError::new(ErrorKind::Storage, "read-only"))
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_failed_save_does_not_fail_commands() {
        let state = Arc::new(StateManager::from_provider(Arc::new(ReadOnlyState)));
        let store: Arc<dyn EntityStore<TestCase>> = Arc::new(MemoryEntityStore::empty());
        let service = TreeService::new(TreeSeed::default(), state, store).await;

        let parent = service
            .create_folder(CreateFolder {
                name: "Auth".into(),
                parent_id: None,
            })
            .await
            .unwrap();
        let child = service
            .create_folder(CreateFolder {
                name: "SSO".into(),
                parent_id: Some(parent.id.clone()),
            })
            .await
            .unwrap();
        assert!(service.is_folder_expanded(&child.id).await);

        assert!(!service.toggle_folder_expanded(&child.id).await);
        assert!(!service.is_folder_expanded(&child.id).await);
        assert!(service.set_folder_expanded(&child.id, true).await);

        service.delete_folder(&parent.id).await.unwrap();
        let tree = service.get_tree_structure().await;
        assert!(!tree.folders.contains_key(&parent.id));
        assert_eq!(tree.root_folder_ids, vec![child.id.clone()]);
        assert!(!service.is_folder_expanded(&parent.id).await);
        assert!(service.is_folder_expanded(&child.id).await);
    }

    #[tokio::test]
    async fn test_corrupt_saved_state_starts_collapsed() {
        let provider = Arc::new(MemoryStateProvider::new(&MemoryStateConfig::default()));
        provider
            .set(&keys::tree_expanded_state(), "{not json")
            .await
            .unwrap();
        let state = Arc::new(StateManager::from_provider(provider));
        let store: Arc<dyn EntityStore<TestCase>> = Arc::new(MemoryEntityStore::empty());
        let seed: TreeSeed = serde_json::from_str(
            r#"{"folders": [{"id": "f1", "name": "Auth", "expanded": true}], "rootFolderIds": ["f1"]}"#,
        )
        .unwrap();

        let service = TreeService::new(seed, state, store).await;
        assert!(!service.is_folder_expanded(&FolderId::new("f1")).await);
    }

    #[tokio::test]
    async fn test_run_plan_message() {
        let (service, _) = service(TreeSeed::default()).await;
        let folder = service
            .create_folder(CreateFolder {
                name: "Smoke".into(),
                parent_id: None,
            })
            .await
            .unwrap();
        for id in ["tc_1", "tc_2"] {
            service
                .move_test_case_to_folder(&TestCaseId::new(id), Some(&folder.id))
                .await
                .unwrap();
        }

        let plan = service.run_all_tests_in_folder(&folder.id).await.unwrap();
        assert_eq!(plan.message, "Started execution of 2 test cases");
        assert_eq!(plan.test_case_ids.len(), 2);

        let err = service
            .run_all_tests_in_folder(&FolderId::new("ghost"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_test_case_places_it() {
        let (service, _) = service(TreeSeed::default()).await;
        let folder = service
            .create_folder(CreateFolder {
                name: "Checkout".into(),
                parent_id: None,
            })
            .await
            .unwrap();

        let loose = service
            .create_test_case(
                CreateTestCase {
                    title: "Guest checkout".into(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        let filed = service
            .create_test_case(
                CreateTestCase {
                    title: "Saved card".into(),
                    steps: vec!["Pay".into(), "  ".into()],
                    ..Default::default()
                },
                Some(&folder.id),
            )
            .await
            .unwrap();
        assert_eq!(filed.steps, vec!["Pay".to_string()]);

        let tree = service.get_tree_structure().await;
        assert_eq!(tree.unassigned_test_case_ids, vec![loose.id.clone()]);
        assert_eq!(tree.folders[&folder.id].test_case_ids, vec![filed.id.clone()]);
        assert_eq!(service.folder_of_test_case(&filed.id).await, Some(folder.id.clone()));
        assert_eq!(service.unassigned_test_cases().await.unwrap(), vec![loose]);
    }

    #[tokio::test]
    async fn test_create_test_case_rejects_bad_input_without_storing() {
        let (service, _) = service(TreeSeed::default()).await;

        let err = service
            .create_test_case(
                CreateTestCase {
                    title: "   ".into(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = service
            .create_test_case(
                CreateTestCase {
                    title: "Orphan".into(),
                    ..Default::default()
                },
                Some(&FolderId::new("ghost")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        assert!(service.test_cases.get_all().await.unwrap().is_empty());
        assert!(service.get_tree_structure().await.unassigned_test_case_ids.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_drop_leaves_tree_untouched() {
        let (service, _) = service(TreeSeed::default()).await;
        let before = service.get_tree_structure().await;

        let err = service.handle_drop("{\"type\": 1}", None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedPayload);
        assert_eq!(service.get_tree_structure().await, before);
    }
}
