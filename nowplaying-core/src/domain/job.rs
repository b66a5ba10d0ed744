//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier issued by the job submission endpoint
///
/// The handle is only ever echoed back to the status endpoint; its content
/// carries no meaning on this side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Outcome of a single status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    /// The job has not finished yet
    Running,
    /// The job finished; carries the raw result payload
    Succeeded(String),
    /// The job finished with any status other than "success"
    Failed(String),
}

impl PollResult {
    /// Whether this outcome ends polling
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Final value handed to the caller once a session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Parsed field text (may be empty when the payload was unusable)
    Success(String),
    /// Human readable failure message
    Failure(String),
}

impl JobOutcome {
    /// The text that ends up in the result field
    ///
    /// Failures always clear the field.
    pub fn field_value(&self) -> &str {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_transparent_on_the_wire() {
        let handle = JobHandle::new("job-1");
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"job-1\"");
        assert_eq!(handle.to_string(), "job-1");
    }

    #[test]
    fn test_only_running_is_non_terminal() {
        assert!(!PollResult::Running.is_terminal());
        assert!(PollResult::Succeeded(String::new()).is_terminal());
        assert!(PollResult::Failed("failure".into()).is_terminal());
    }

    #[test]
    fn test_failure_clears_field() {
        assert_eq!(JobOutcome::Failure("boom".into()).field_value(), "");
        assert_eq!(
            JobOutcome::Success("Artist - Title".into()).field_value(),
            "Artist - Title"
        );
    }
}
