//! Folder tree engine, derived views and the async command API.

pub mod drag;
pub mod engine;
pub mod projection;
pub mod service;

pub use drag::{DropCommand, parse_drag_payload};
pub use engine::FolderTreeEngine;
pub use service::TreeService;
