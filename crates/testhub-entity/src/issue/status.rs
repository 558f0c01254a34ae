//! Issue workflow status and severity enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use testhub_core::AppError;

/// Workflow status of a reported issue.
///
/// Transitions: new → in_progress → fixed → verified → closed, with
/// fixed, verified and closed able to reopen to in_progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Just reported.
    New,
    /// Someone is working on it.
    InProgress,
    /// A fix has landed.
    Fixed,
    /// The fix was confirmed by QA.
    Verified,
    /// Done.
    Closed,
}

impl IssueStatus {
    /// Statuses reachable from this one.
    pub fn next_statuses(&self) -> &'static [IssueStatus] {
        match self {
            Self::New => &[Self::InProgress],
            Self::InProgress => &[Self::Fixed],
            Self::Fixed => &[Self::Verified, Self::InProgress],
            Self::Verified => &[Self::Closed, Self::InProgress],
            Self::Closed => &[Self::InProgress],
        }
    }

    /// Whether moving to `next` follows the workflow.
    pub fn can_transition_to(&self, next: IssueStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    /// Whether the issue still needs attention.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Verified | Self::Closed)
    }

    /// Whether a fix exists.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Fixed | Self::Verified | Self::Closed)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Fixed => "fixed",
            Self::Verified => "verified",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "fixed" => Ok(Self::Fixed),
            "verified" => Ok(Self::Verified),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::validation(format!(
                "Invalid issue status: '{s}'. Expected one of: new, in_progress, fixed, verified, closed"
            ))),
        }
    }
}

/// Impact of an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks a release.
    Critical,
    /// Major functionality broken.
    High,
    /// Default severity.
    #[default]
    Medium,
    /// Cosmetic.
    Low,
}

impl Severity {
    /// Return the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(AppError::validation(format!(
                "Invalid severity: '{s}'. Expected one of: critical, high, medium, low"
            ))),
        }
    }
}
