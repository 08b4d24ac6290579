/// Stage definitions for a single page analysis
use std::fmt;

/// Represents the current stage of one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStage {
    // ===== Active Stages =====
    /// The target page is being downloaded
    Fetching,

    /// The downloaded body is being parsed
    Parsing,

    /// Raw hrefs are being resolved and tagged internal/external
    Classifying,

    /// Links are being checked for liveness
    Probing,

    // ===== Terminal Stages =====
    /// A result was assembled (possibly with partial probe results)
    Done,

    /// Fetch or parse failed; no result was produced
    Failed,
}

impl AnalysisStage {
    /// Returns true if no further stage follows
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Checks whether moving to `next` is a legal step
    ///
    /// Stages only move forward. Probing may be skipped when a page has no
    /// links, and only fetch and parse failures abort an analysis.
    pub fn can_transition_to(&self, next: Self) -> bool {
        use AnalysisStage::*;

        matches!(
            (self, next),
            (Fetching, Parsing)
                | (Fetching, Failed)
                | (Parsing, Classifying)
                | (Parsing, Failed)
                | (Classifying, Probing)
                | (Classifying, Done)
                | (Probing, Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Classifying => "classifying",
            Self::Probing => "probing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all stages in pipeline order
    pub fn all_stages() -> Vec<Self> {
        vec![
            Self::Fetching,
            Self::Parsing,
            Self::Classifying,
            Self::Probing,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
