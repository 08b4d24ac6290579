/// Job status definitions for queued analyses
///
/// This is the lifecycle the storing layer records around each analysis.
use serde::Serialize;
use std::fmt;

/// Represents the current status of an analysis job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    // ===== Active States =====
    /// Job is waiting for a free worker
    Queued,

    /// A worker is analyzing the page
    Running,

    // ===== Terminal States =====
    /// Analysis produced a result
    Completed,

    /// Analysis failed, or was cancelled before it started
    Error,
}

impl JobStatus {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Returns true if the job may still make progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }

    /// Checks whether moving to `next` is a legal status change
    ///
    /// Finished jobs may return to `Queued` when the same target is
    /// submitted again for reanalysis.
    pub fn can_transition_to(&self, next: Self) -> bool {
        use JobStatus::*;

        matches!(
            (self, next),
            (Queued, Running)
                | (Queued, Error)
                | (Running, Completed)
                | (Running, Error)
                | (Completed, Queued)
                | (Error, Queued)
        )
    }

    /// Converts the status to the string stored by the persistence layer
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Parses a status from its stored string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns all possible job statuses
    pub fn all_states() -> Vec<Self> {
        vec![Self::Queued, Self::Running, Self::Completed, Self::Error]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
