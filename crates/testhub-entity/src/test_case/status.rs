//! Test case priority and run status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use testhub_core::AppError;

/// Outcome of executing a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every step behaved as expected.
    Passed,
    /// At least one step did not.
    Failed,
    /// Execution could not proceed.
    Blocked,
}

impl RunStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Blocked => "blocked",
        }
    }

    /// Display label for an optional latest status (`"Not Run"` when absent).
    pub fn label(status: Option<Self>) -> &'static str {
        match status {
            Some(Self::Passed) => "Passed",
            Some(Self::Failed) => "Failed",
            Some(Self::Blocked) => "Blocked",
            None => "Not Run",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            "blocked" => Ok(Self::Blocked),
            _ => Err(AppError::validation(format!(
                "Invalid run status: '{s}'. Expected one of: passed, failed, blocked"
            ))),
        }
    }
}

/// Test case priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Run first.
    High,
    /// Default priority.
    #[default]
    Medium,
    /// Run when time allows.
    Low,
}

impl Priority {
    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(AppError::validation(format!(
                "Invalid priority: '{s}'. Expected one of: high, medium, low"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("PASSED".parse::<RunStatus>().unwrap(), RunStatus::Passed);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert!("skipped".parse::<RunStatus>().is_err());
    }

    #[test]
    fn test_label() {
        assert_eq!(RunStatus::label(None), "Not Run");
        assert_eq!(RunStatus::label(Some(RunStatus::Failed)), "Failed");
    }
}
