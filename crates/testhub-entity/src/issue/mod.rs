//! Issue domain entities.

pub mod model;
pub mod status;

pub use model::{CreateIssue, Issue, UpdateIssue};
pub use status::{IssueStatus, Severity};
