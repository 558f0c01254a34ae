//! Folder domain entities.

pub mod drag;
pub mod model;
pub mod tree;

pub use drag::{DragItemKind, DragPayload};
pub use model::{CreateFolder, Folder, UpdateFolder};
pub use tree::{FolderRunPlan, FolderStats, TreeNode, TreeSeed, TreeStructure};
