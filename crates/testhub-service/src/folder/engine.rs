//! The folder tree engine: the only writer of tree state.
//!
//! Folders live in an arena keyed by id; parent and child links are ids.
//! Every operation either fails without touching state or applies fully,
//! and every successful mutation preserves two invariants:
//!
//! - **forest**: no folder is its own ancestor, each `child_folder_ids`
//!   mirrors the folders whose `parent_id` points at it, and roots are
//!   exactly the parentless folders;
//! - **partition**: every known test case sits in exactly one folder's
//!   `test_case_ids` or in `unassigned_test_case_ids`.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use testhub_core::error::AppError;
use testhub_core::result::AppResult;
use testhub_core::types::{FolderId, TestCaseId};
use testhub_entity::folder::{CreateFolder, Folder, TreeSeed, TreeStructure, UpdateFolder};

use super::projection;

/// Owns the folder hierarchy, test-case placement and expansion state.
#[derive(Debug, Clone, Default)]
pub struct FolderTreeEngine {
    /// Current tree state.
    tree: TreeStructure,
    /// Reverse index: test case → containing folder (`None` = unassigned).
    locations: HashMap<TestCaseId, Option<FolderId>>,
}

impl FolderTreeEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an engine from a seed layout.
    ///
    /// Expansion state starts from each folder's `expanded` hint; callers
    /// holding a saved expansion set replace it with [`Self::restore_expanded`].
    pub fn from_seed(seed: TreeSeed) -> Self {
        let mut tree = TreeStructure {
            root_folder_ids: seed.root_folder_ids,
            unassigned_test_case_ids: seed.unassigned_test_case_ids,
            ..Default::default()
        };
        for folder in seed.folders {
            if folder.expanded {
                tree.expanded_state.insert(folder.id.clone());
            }
            tree.folders.insert(folder.id.clone(), folder);
        }

        let mut locations = HashMap::new();
        for id in &tree.unassigned_test_case_ids {
            locations.insert(id.clone(), None);
        }
        for folder in tree.folders.values() {
            for id in &folder.test_case_ids {
                locations.insert(id.clone(), Some(folder.id.clone()));
            }
        }

        let engine = Self { tree, locations };
        for violation in engine.integrity_violations() {
            warn!(%violation, "Seed tree violates an invariant");
        }
        engine
    }

    /// Replaces the expansion set with a previously saved one.
    pub fn restore_expanded(&mut self, ids: impl IntoIterator<Item = FolderId>) {
        self.tree.expanded_state = ids.into_iter().collect();
    }

    /// Read-only view of the current state.
    pub fn tree(&self) -> &TreeStructure {
        &self.tree
    }

    /// Independent copy of the current state.
    pub fn snapshot(&self) -> TreeStructure {
        self.tree.clone()
    }

    /// Looks up a folder.
    pub fn get_folder_by_id(&self, id: &FolderId) -> AppResult<Folder> {
        self.tree
            .folder(id)
            .cloned()
            .ok_or_else(|| folder_not_found(id))
    }

    /// Every folder, ordered by id.
    pub fn all_folders(&self) -> Vec<Folder> {
        self.tree.folders.values().cloned().collect()
    }

    /// Where a test case currently sits: `Some(Some(folder))`, `Some(None)`
    /// when unassigned, `None` when the tree has never seen it.
    pub fn location_of(&self, test_case_id: &TestCaseId) -> Option<Option<&FolderId>> {
        self.locations.get(test_case_id).map(Option::as_ref)
    }

    /// Creates a folder at the root or under an existing parent.
    pub fn create_folder(&mut self, req: CreateFolder) -> AppResult<Folder> {
        let name = validate_name(&req.name)?;

        if let Some(parent_id) = &req.parent_id {
            if !self.tree.contains_folder(parent_id) {
                return Err(AppError::not_found(format!(
                    "Parent folder not found: {parent_id}"
                )));
            }
        }

        let folder = Folder::new(name, req.parent_id);
        match &folder.parent_id {
            Some(parent_id) => {
                let parent = self.folder_mut(parent_id)?;
                parent.child_folder_ids.push(folder.id.clone());
                parent.touch();
            }
            None => self.tree.root_folder_ids.push(folder.id.clone()),
        }

        self.tree.expanded_state.insert(folder.id.clone());
        self.tree.folders.insert(folder.id.clone(), folder.clone());
        Ok(folder)
    }

    /// Renames a folder. Reparenting goes through [`Self::move_folder_to_folder`].
    pub fn update_folder(&mut self, id: &FolderId, updates: UpdateFolder) -> AppResult<Folder> {
        let name = updates.name.as_deref().map(validate_name).transpose()?;

        let folder = self.folder_mut(id)?;
        if let Some(name) = name {
            folder.name = name;
        }
        folder.touch();
        Ok(folder.clone())
    }

    /// Removes a single folder.
    ///
    /// Child folders are spliced up to the removed folder's parent (or the
    /// root) after the parent's existing children; directly assigned test
    /// cases become unassigned. Nothing below the folder is deleted.
    pub fn delete_folder(&mut self, id: &FolderId) -> AppResult<Folder> {
        let folder = self
            .tree
            .folders
            .remove(id)
            .ok_or_else(|| folder_not_found(id))?;

        for child_id in &folder.child_folder_ids {
            if let Some(child) = self.tree.folders.get_mut(child_id) {
                child.parent_id = folder.parent_id.clone();
                child.touch();
            }
        }

        for test_case_id in &folder.test_case_ids {
            self.locations.insert(test_case_id.clone(), None);
        }
        self.tree
            .unassigned_test_case_ids
            .extend(folder.test_case_ids.iter().cloned());

        match &folder.parent_id {
            Some(parent_id) => {
                if let Some(parent) = self.tree.folders.get_mut(parent_id) {
                    parent.child_folder_ids.retain(|cid| cid != id);
                    parent
                        .child_folder_ids
                        .extend(folder.child_folder_ids.iter().cloned());
                    parent.touch();
                }
            }
            None => {
                self.tree.root_folder_ids.retain(|rid| rid != id);
                self.tree
                    .root_folder_ids
                    .extend(folder.child_folder_ids.iter().cloned());
            }
        }

        self.tree.expanded_state.remove(id);
        Ok(folder)
    }

    /// Places a test case in a folder, or unassigns it when `target` is `None`.
    ///
    /// Test-case ids are opaque: an id the tree has never seen is simply
    /// inserted. Moving a test case to where it already is keeps its
    /// position and only refreshes the folder's timestamp.
    pub fn move_test_case_to_folder(
        &mut self,
        test_case_id: &TestCaseId,
        target: Option<&FolderId>,
    ) -> AppResult<()> {
        if let Some(target_id) = target {
            if !self.tree.contains_folder(target_id) {
                return Err(AppError::not_found(format!(
                    "Target folder not found: {target_id}"
                )));
            }
        }

        let current = self.locations.get(test_case_id).cloned();
        if current.as_ref().map(Option::as_ref) == Some(target) {
            if let Some(target_id) = target {
                self.folder_mut(target_id)?.touch();
            }
            return Ok(());
        }

        match current {
            Some(Some(source_id)) => {
                if let Some(source) = self.tree.folders.get_mut(&source_id) {
                    source.test_case_ids.retain(|tc| tc != test_case_id);
                    source.touch();
                }
            }
            Some(None) => self
                .tree
                .unassigned_test_case_ids
                .retain(|tc| tc != test_case_id),
            None => {}
        }

        match target {
            Some(target_id) => {
                let folder = self.folder_mut(target_id)?;
                folder.test_case_ids.push(test_case_id.clone());
                folder.touch();
            }
            None => self
                .tree
                .unassigned_test_case_ids
                .push(test_case_id.clone()),
        }

        self.locations
            .insert(test_case_id.clone(), target.cloned());
        Ok(())
    }

    /// Reparents a folder under `target`, or to the root when `target` is `None`.
    ///
    /// Rejected with a cycle error, leaving state untouched, when `target`
    /// is the folder itself or one of its descendants.
    pub fn move_folder_to_folder(
        &mut self,
        folder_id: &FolderId,
        target: Option<&FolderId>,
    ) -> AppResult<Folder> {
        let old_parent = self
            .tree
            .folder(folder_id)
            .ok_or_else(|| folder_not_found(folder_id))?
            .parent_id
            .clone();

        if let Some(target_id) = target {
            if target_id == folder_id || projection::is_descendant(&self.tree, target_id, folder_id)
            {
                return Err(AppError::cycle(format!(
                    "Cannot move folder {folder_id} into itself or its descendants"
                )));
            }
            if !self.tree.contains_folder(target_id) {
                return Err(AppError::not_found(format!(
                    "Target folder not found: {target_id}"
                )));
            }
        }

        match &old_parent {
            Some(parent_id) => {
                if let Some(parent) = self.tree.folders.get_mut(parent_id) {
                    parent.child_folder_ids.retain(|cid| cid != folder_id);
                    parent.touch();
                }
            }
            None => self.tree.root_folder_ids.retain(|rid| rid != folder_id),
        }

        match target {
            Some(target_id) => {
                let parent = self.folder_mut(target_id)?;
                parent.child_folder_ids.push(folder_id.clone());
                parent.touch();
            }
            None => self.tree.root_folder_ids.push(folder_id.clone()),
        }

        let folder = self.folder_mut(folder_id)?;
        folder.parent_id = target.cloned();
        folder.touch();
        Ok(folder.clone())
    }

    /// Flips a folder's expansion and returns the new state.
    pub fn toggle_folder_expanded(&mut self, id: &FolderId) -> bool {
        if !self.tree.expanded_state.remove(id) {
            self.tree.expanded_state.insert(id.clone());
        }
        self.tree.is_expanded(id)
    }

    /// Sets a folder's expansion and returns it.
    pub fn set_folder_expanded(&mut self, id: &FolderId, expanded: bool) -> bool {
        if expanded {
            self.tree.expanded_state.insert(id.clone());
        } else {
            self.tree.expanded_state.remove(id);
        }
        expanded
    }

    /// Whether a folder is currently expanded.
    pub fn is_folder_expanded(&self, id: &FolderId) -> bool {
        self.tree.is_expanded(id)
    }

    /// Expanded folder ids in a stable order, as persisted.
    pub fn expanded_ids(&self) -> Vec<FolderId> {
        self.tree.expanded_state.iter().cloned().collect()
    }

    /// Describes every broken forest or partition invariant. Empty when healthy.
    pub fn integrity_violations(&self) -> Vec<String> {
        let tree = &self.tree;
        let mut violations = Vec::new();

        for (id, folder) in &tree.folders {
            if &folder.id != id {
                violations.push(format!("folder keyed {id} carries id {}", folder.id));
            }
            match &folder.parent_id {
                Some(parent_id) => match tree.folder(parent_id) {
                    Some(parent) => {
                        let links = parent.child_folder_ids.iter().filter(|c| *c == id).count();
                        if links != 1 {
                            violations.push(format!(
                                "folder {id} listed {links} times under parent {parent_id}"
                            ));
                        }
                    }
                    None => violations.push(format!("folder {id} has missing parent {parent_id}")),
                },
                None => {
                    let links = tree.root_folder_ids.iter().filter(|r| *r == id).count();
                    if links != 1 {
                        violations.push(format!("root folder {id} listed {links} times as root"));
                    }
                }
            }
            for child_id in &folder.child_folder_ids {
                let points_back = tree
                    .folder(child_id)
                    .is_some_and(|child| child.parent_id.as_ref() == Some(id));
                if !points_back {
                    violations.push(format!("folder {id} lists {child_id} which is not its child"));
                }
            }
            if projection::is_descendant(tree, id, id) {
                violations.push(format!("folder {id} is its own ancestor"));
            }
        }

        for root_id in &tree.root_folder_ids {
            if tree.folder(root_id).is_none_or(|f| f.parent_id.is_some()) {
                violations.push(format!("root list holds non-root {root_id}"));
            }
        }

        let mut seen: HashSet<&TestCaseId> = HashSet::new();
        let placed = tree
            .folders
            .values()
            .flat_map(|f| f.test_case_ids.iter())
            .chain(tree.unassigned_test_case_ids.iter());
        for test_case_id in placed {
            if !seen.insert(test_case_id) {
                violations.push(format!("test case {test_case_id} placed more than once"));
            }
        }
        if seen.len() != self.locations.len() {
            violations.push(format!(
                "location index tracks {} test cases but {} are placed",
                self.locations.len(),
                seen.len()
            ));
        }

        violations
    }

    fn folder_mut(&mut self, id: &FolderId) -> AppResult<&mut Folder> {
        self.tree
            .folders
            .get_mut(id)
            .ok_or_else(|| folder_not_found(id))
    }
}

fn folder_not_found(id: &FolderId) -> AppError {
    AppError::not_found(format!("Folder not found: {id}"))
}

fn validate_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use testhub_core::error::ErrorKind;

    fn create(engine: &mut FolderTreeEngine, name: &str, parent: Option<&FolderId>) -> FolderId {
        engine
            .create_folder(CreateFolder {
                name: name.to_string(),
                parent_id: parent.cloned(),
            })
            .expect("create folder")
            .id
    }

    fn tc(id: &str) -> TestCaseId {
        TestCaseId::new(id)
    }

    #[test]
    fn test_create_root_and_child() {
        let mut engine = FolderTreeEngine::new();
        let login = create(&mut engine, "Login", None);
        let edge = create(&mut engine, "Edge Cases", Some(&login));

        let tree = engine.tree();
        assert_eq!(tree.root_folder_ids, vec![login.clone()]);
        assert_eq!(tree.folder(&login).unwrap().child_folder_ids, vec![edge.clone()]);
        assert_eq!(tree.folder(&edge).unwrap().parent_id, Some(login.clone()));
        assert!(engine.is_folder_expanded(&login));
        assert!(engine.is_folder_expanded(&edge));
        assert!(engine.integrity_violations().is_empty());
    }

    #[test]
    fn test_create_under_missing_parent_fails() {
        let mut engine = FolderTreeEngine::new();
        let err = engine
            .create_folder(CreateFolder {
                name: "Orphan".into(),
                parent_id: Some(FolderId::new("folder_missing")),
            })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(engine.tree().folders.is_empty());
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let mut engine = FolderTreeEngine::new();
        let err = engine
            .create_folder(CreateFolder {
                name: "   ".into(),
                parent_id: None,
            })
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let id = create(&mut engine, "Checkout", None);
        let err = engine
            .update_folder(&id, UpdateFolder::rename(""))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(engine.tree().folder(&id).unwrap().name, "Checkout");
    }

    #[test]
    fn test_update_renames_and_touches() {
        let mut engine = FolderTreeEngine::new();
        let id = create(&mut engine, "Checkout", None);
        let before = engine.tree().folder(&id).unwrap().updated_at;

        let updated = engine.update_folder(&id, UpdateFolder::rename("Payments")).unwrap();
        assert_eq!(updated.name, "Payments");
        assert!(updated.updated_at >= before);

        let err = engine
            .update_folder(&FolderId::new("nope"), UpdateFolder::default())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_reparents_children_to_parent() {
        let mut engine = FolderTreeEngine::new();
        let parent = create(&mut engine, "P", None);
        let sibling = create(&mut engine, "S", Some(&parent));
        let doomed = create(&mut engine, "F", Some(&parent));
        let c1 = create(&mut engine, "C1", Some(&doomed));
        let c2 = create(&mut engine, "C2", Some(&doomed));
        engine.move_test_case_to_folder(&tc("tc_1"), Some(&doomed)).unwrap();
        engine.move_test_case_to_folder(&tc("tc_2"), Some(&c1)).unwrap();

        let removed = engine.delete_folder(&doomed).unwrap();
        assert_eq!(removed.id, doomed);

        let tree = engine.tree();
        assert_eq!(
            tree.folder(&parent).unwrap().child_folder_ids,
            vec![sibling, c1.clone(), c2.clone()]
        );
        assert_eq!(tree.folder(&c1).unwrap().parent_id, Some(parent.clone()));
        assert_eq!(tree.folder(&c2).unwrap().parent_id, Some(parent));
        assert_eq!(tree.unassigned_test_case_ids, vec![tc("tc_1")]);
        assert_eq!(tree.folder(&c1).unwrap().test_case_ids, vec![tc("tc_2")]);
        assert!(!tree.is_expanded(&doomed));
        assert!(engine.integrity_violations().is_empty());
    }

    #[test]
    fn test_delete_root_promotes_children_to_root() {
        let mut engine = FolderTreeEngine::new();
        let other = create(&mut engine, "Other", None);
        let root = create(&mut engine, "Root", None);
        let child = create(&mut engine, "Child", Some(&root));

        engine.delete_folder(&root).unwrap();

        let tree = engine.tree();
        assert_eq!(tree.root_folder_ids, vec![other, child.clone()]);
        assert!(tree.folder(&child).unwrap().is_root());
        assert!(engine.integrity_violations().is_empty());

        let err = engine.delete_folder(&root).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_move_test_case_between_locations() {
        let mut engine = FolderTreeEngine::new();
        let a = create(&mut engine, "A", None);
        let b = create(&mut engine, "B", None);

        engine.move_test_case_to_folder(&tc("tc_1"), None).unwrap();
        assert_eq!(engine.location_of(&tc("tc_1")), Some(None));

        engine.move_test_case_to_folder(&tc("tc_1"), Some(&a)).unwrap();
        engine.move_test_case_to_folder(&tc("tc_1"), Some(&b)).unwrap();

        let tree = engine.tree();
        assert!(tree.unassigned_test_case_ids.is_empty());
        assert!(tree.folder(&a).unwrap().test_case_ids.is_empty());
        assert_eq!(tree.folder(&b).unwrap().test_case_ids, vec![tc("tc_1")]);
        assert_eq!(engine.location_of(&tc("tc_1")), Some(Some(&b)));
    }

    #[test]
    fn test_move_test_case_to_same_folder_is_idempotent() {
        let mut engine = FolderTreeEngine::new();
        let a = create(&mut engine, "A", None);
        engine.move_test_case_to_folder(&tc("tc_1"), Some(&a)).unwrap();
        engine.move_test_case_to_folder(&tc("tc_2"), Some(&a)).unwrap();
        let before = engine.tree().folder(&a).unwrap().updated_at;

        engine.move_test_case_to_folder(&tc("tc_1"), Some(&a)).unwrap();

        let folder = engine.tree().folder(&a).unwrap();
        assert_eq!(folder.test_case_ids, vec![tc("tc_1"), tc("tc_2")]);
        assert!(folder.updated_at >= before);
    }

    #[test]
    fn test_move_test_case_to_missing_folder_keeps_placement() {
        let mut engine = FolderTreeEngine::new();
        let a = create(&mut engine, "A", None);
        engine.move_test_case_to_folder(&tc("tc_1"), Some(&a)).unwrap();
        let before = engine.snapshot();

        let err = engine
            .move_test_case_to_folder(&tc("tc_1"), Some(&FolderId::new("ghost")))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_move_folder_rejects_cycles() {
        let mut engine = FolderTreeEngine::new();
        let login = create(&mut engine, "Login", None);
        let edge = create(&mut engine, "Edge Cases", Some(&login));
        let deeper = create(&mut engine, "Deeper", Some(&edge));
        let before = engine.snapshot();

        for target in [&login, &edge, &deeper] {
            let err = engine.move_folder_to_folder(&login, Some(target)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Cycle);
        }
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_move_folder_reparents() {
        let mut engine = FolderTreeEngine::new();
        let a = create(&mut engine, "A", None);
        let b = create(&mut engine, "B", None);
        let child = create(&mut engine, "Child", Some(&a));

        let moved = engine.move_folder_to_folder(&child, Some(&b)).unwrap();
        assert_eq!(moved.parent_id, Some(b.clone()));
        assert!(engine.tree().folder(&a).unwrap().child_folder_ids.is_empty());
        assert_eq!(engine.tree().folder(&b).unwrap().child_folder_ids, vec![child.clone()]);

        engine.move_folder_to_folder(&child, None).unwrap();
        assert_eq!(engine.tree().root_folder_ids, vec![a, b.clone(), child]);
        assert!(engine.tree().folder(&b).unwrap().child_folder_ids.is_empty());
        assert!(engine.integrity_violations().is_empty());
    }

    #[test]
    fn test_move_folder_unknown_ids() {
        let mut engine = FolderTreeEngine::new();
        let a = create(&mut engine, "A", None);

        let err = engine
            .move_folder_to_folder(&FolderId::new("ghost"), None)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let before = engine.snapshot();
        let err = engine
            .move_folder_to_folder(&a, Some(&FolderId::new("ghost")))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_expansion_toggles() {
        let mut engine = FolderTreeEngine::new();
        let id = FolderId::new("never_created");
        assert!(engine.toggle_folder_expanded(&id));
        assert!(!engine.toggle_folder_expanded(&id));
        assert!(engine.set_folder_expanded(&id, true));
        assert!(engine.is_folder_expanded(&id));
        assert!(!engine.set_folder_expanded(&id, false));
        assert!(engine.expanded_ids().is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut engine = FolderTreeEngine::new();
        let a = create(&mut engine, "A", None);
        let mut snapshot = engine.snapshot();
        snapshot.root_folder_ids.clear();
        snapshot.expanded_state.clear();

        assert_eq!(engine.tree().root_folder_ids, vec![a.clone()]);
        assert!(engine.is_folder_expanded(&a));
    }

    #[test]
    fn test_from_seed_builds_index_and_default_expansion() {
        let seed: TreeSeed = serde_json::from_str(
            r#"{
                "folders": [
                    {"id": "f1", "name": "Auth", "expanded": true,
                     "childFolderIds": ["f2"], "testCaseIds": ["tc_1"]},
                    {"id": "f2", "name": "SSO", "parentId": "f1", "testCaseIds": ["tc_2"]}
                ],
                "rootFolderIds": ["f1"],
                "unassignedTestCaseIds": ["tc_3"]
            }"#,
        )
        .unwrap();

        let engine = FolderTreeEngine::from_seed(seed);
        assert!(engine.integrity_violations().is_empty());
        assert!(engine.is_folder_expanded(&FolderId::new("f1")));
        assert!(!engine.is_folder_expanded(&FolderId::new("f2")));
        assert_eq!(
            engine.location_of(&tc("tc_2")),
            Some(Some(&FolderId::new("f2")))
        );
        assert_eq!(engine.location_of(&tc("tc_3")), Some(None));
    }

    #[test]
    fn test_integrity_detects_malformed_seed() {
        let seed: TreeSeed = serde_json::from_str(
            r#"{
                "folders": [
                    {"id": "a", "name": "A", "parentId": "b", "childFolderIds": ["b"]},
                    {"id": "b", "name": "B", "parentId": "a", "childFolderIds": ["a"]}
                ],
                "rootFolderIds": []
            }"#,
        )
        .unwrap();

        let engine = FolderTreeEngine::from_seed(seed);
        let violations = engine.integrity_violations();
        assert!(violations.iter().any(|v| v.contains("own ancestor")));
    }
}
