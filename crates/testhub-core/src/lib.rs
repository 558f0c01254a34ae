//! # testhub-core
//!
//! Core crate for TestHub. Contains the collaborator traits (entity store,
//! state provider), configuration schemas, typed identifiers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other TestHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
