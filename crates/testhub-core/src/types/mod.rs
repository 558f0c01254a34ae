//! Core type definitions used across the TestHub workspace.

pub mod id;

pub use id::*;
