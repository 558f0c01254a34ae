//! Property-based tests for the folder tree engine using proptest.
//!
//! Random command sequences must never break the forest or partition
//! invariants, and a rejected command must leave the tree untouched.

use proptest::prelude::*;

use testhub_core::error::ErrorKind;
use testhub_core::types::{FolderId, TestCaseId};
use testhub_entity::folder::{CreateFolder, UpdateFolder};
use testhub_service::folder::projection;
use testhub_service::FolderTreeEngine;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// A command with folder references as indexes into the current folder list.
#[derive(Debug, Clone)]
enum Op {
    Create { parent: Option<usize> },
    Rename { folder: usize },
    Delete { folder: usize },
    MoveTestCase { test_case: u8, target: Option<usize> },
    MoveFolder { folder: usize, target: Option<usize> },
    Toggle { folder: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => proptest::option::of(any::<usize>()).prop_map(|parent| Op::Create { parent }),
        1 => any::<usize>().prop_map(|folder| Op::Rename { folder }),
        1 => any::<usize>().prop_map(|folder| Op::Delete { folder }),
        3 => (0u8..12, proptest::option::of(any::<usize>()))
            .prop_map(|(test_case, target)| Op::MoveTestCase { test_case, target }),
        3 => (any::<usize>(), proptest::option::of(any::<usize>()))
            .prop_map(|(folder, target)| Op::MoveFolder { folder, target }),
        1 => any::<usize>().prop_map(|folder| Op::Toggle { folder }),
    ]
}

fn pick(ids: &[FolderId], index: usize) -> Option<FolderId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()].clone())
    }
}

fn apply(engine: &mut FolderTreeEngine, op: &Op) -> Result<(), ErrorKind> {
    let ids: Vec<FolderId> = engine.all_folders().into_iter().map(|f| f.id).collect();
    let result = match op {
        Op::Create { parent } => engine
            .create_folder(CreateFolder {
                name: "Folder".into(),
                parent_id: parent.and_then(|i| pick(&ids, i)),
            })
            .map(|_| ()),
        Op::Rename { folder } => match pick(&ids, *folder) {
            Some(id) => engine.update_folder(&id, UpdateFolder::rename("Renamed")).map(|_| ()),
            None => Ok(()),
        },
        Op::Delete { folder } => match pick(&ids, *folder) {
            Some(id) => engine.delete_folder(&id).map(|_| ()),
            None => Ok(()),
        },
        Op::MoveTestCase { test_case, target } => {
            let target = target.and_then(|i| pick(&ids, i));
            engine.move_test_case_to_folder(
                &TestCaseId::new(format!("tc_{test_case}")),
                target.as_ref(),
            )
        }
        Op::MoveFolder { folder, target } => match pick(&ids, *folder) {
            Some(id) => {
                let target = target.and_then(|i| pick(&ids, i));
                engine.move_folder_to_folder(&id, target.as_ref()).map(|_| ())
            }
            None => Ok(()),
        },
        Op::Toggle { folder } => {
            if let Some(id) = pick(&ids, *folder) {
                engine.toggle_folder_expanded(&id);
            }
            Ok(())
        }
    };
    result.map_err(|e| e.kind)
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn random_commands_preserve_invariants(ops in proptest::collection::vec(arb_op(), 1..60)) {
        let mut engine = FolderTreeEngine::new();

        for op in &ops {
            let before = engine.snapshot();
            match apply(&mut engine, op) {
                Ok(()) => {}
                Err(kind) => {
                    prop_assert_eq!(kind, ErrorKind::Cycle, "unexpected failure for {:?}", op);
                    prop_assert_eq!(&engine.snapshot(), &before, "rejected {:?} mutated state", op);
                }
            }

            let violations = engine.integrity_violations();
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
        }
    }

    #[test]
    fn cycle_rejected_exactly_for_self_or_descendant(
        setup in proptest::collection::vec(arb_op(), 1..40),
        folder in any::<usize>(),
        target in any::<usize>(),
    ) {
        let mut engine = FolderTreeEngine::new();
        for op in &setup {
            let _ = apply(&mut engine, op);
        }

        let ids: Vec<FolderId> = engine.all_folders().into_iter().map(|f| f.id).collect();
        prop_assume!(!ids.is_empty());
        let folder = ids[folder % ids.len()].clone();
        let target = ids[target % ids.len()].clone();

        let would_cycle = folder == target
            || projection::is_descendant(engine.tree(), &target, &folder);
        let before = engine.snapshot();
        let result = engine.move_folder_to_folder(&folder, Some(&target));

        prop_assert_eq!(result.is_err(), would_cycle);
        if let Err(e) = &result {
            prop_assert_eq!(e.kind, ErrorKind::Cycle);
            prop_assert_eq!(&engine.snapshot(), &before);
        } else {
            prop_assert_eq!(
                engine.tree().folder(&folder).and_then(|f| f.parent_id.clone()),
                Some(target)
            );
        }
    }

    #[test]
    fn delete_keeps_every_test_case(
        setup in proptest::collection::vec(arb_op(), 1..40),
        doomed in any::<usize>(),
    ) {
        let mut engine = FolderTreeEngine::new();
        for op in &setup {
            let _ = apply(&mut engine, op);
        }

        let ids: Vec<FolderId> = engine.all_folders().into_iter().map(|f| f.id).collect();
        prop_assume!(!ids.is_empty());
        let doomed = ids[doomed % ids.len()].clone();

        let placed_before: usize = engine
            .tree()
            .folders
            .values()
            .map(|f| f.test_case_ids.len())
            .sum::<usize>()
            + engine.tree().unassigned_test_case_ids.len();
        let removed = engine.delete_folder(&doomed).unwrap();

        let placed_after: usize = engine
            .tree()
            .folders
            .values()
            .map(|f| f.test_case_ids.len())
            .sum::<usize>()
            + engine.tree().unassigned_test_case_ids.len();
        prop_assert_eq!(placed_before, placed_after);
        prop_assert_eq!(engine.tree().folder_count(), ids.len() - 1);
        for child in &removed.child_folder_ids {
            prop_assert_eq!(
                engine.tree().folder(child).and_then(|f| f.parent_id.clone()),
                removed.parent_id.clone()
            );
        }
    }
}
