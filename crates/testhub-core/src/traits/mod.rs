//! Core traits defined in `testhub-core` and implemented by other crates.

pub mod state;
pub mod store;

pub use state::StateProvider;
pub use store::{Entity, EntityStore};
