//! # testhub-store
//!
//! Storage collaborators for TestHub:
//!
//! - **entity**: keyed CRUD over test cases, issues and test runs, held in
//!   memory and optionally slowed down to mimic a remote backend
//! - **seed**: loading the initial collections and tree layout from JSON
//! - **state**: small key-value providers for UI state such as folder
//!   expansion, either in-process ([moka](https://crates.io/crates/moka)) or
//!   mirrored to a JSON file so it survives between sessions
//!
//! The state provider is selected at runtime based on configuration.

pub mod entity;
pub mod keys;
pub mod provider;
pub mod seed;
pub mod state;

pub use entity::MemoryEntityStore;
pub use provider::StateManager;
pub use seed::SeedData;
