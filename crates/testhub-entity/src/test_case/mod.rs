//! Test case domain entities.

pub mod model;
pub mod status;

pub use model::{CreateTestCase, TestCase, UpdateTestCase};
pub use status::{Priority, RunStatus};
