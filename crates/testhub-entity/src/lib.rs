//! # testhub-entity
//!
//! Domain entity models for TestHub. Every struct in this crate is either a
//! record held by an entity store, a piece of the folder tree, or a domain
//! value object. Field names serialize as camelCase to match the seed data.

pub mod folder;
pub mod issue;
pub mod test_case;
pub mod test_run;
