//! # testhub-service
//!
//! Business logic for TestHub. The folder tree engine owns the hierarchy
//! and test-case placement; the services around it orchestrate the entity
//! stores and the persisted UI state.
//!
//! Services follow constructor injection: all collaborators are provided
//! at construction time via `Arc` references.

pub mod execution;
pub mod folder;
pub mod issue;
pub mod report;

pub use execution::{ExecutionService, RunRecorded};
pub use folder::{DropCommand, FolderTreeEngine, TreeService};
pub use issue::IssueService;
pub use report::{ReportService, ReportSummary};
