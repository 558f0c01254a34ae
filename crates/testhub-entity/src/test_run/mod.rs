//! Test run domain entities.

pub mod model;

pub use model::{CreateTestRun, TestRun, UpdateTestRun};
