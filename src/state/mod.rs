//! State module for tracking analysis progress
//!
//! # Components
//!
//! - `AnalysisStage`: where a single analysis currently is (fetching, parsing, ...)
//! - `JobStatus`: lifecycle of a queued analysis job (queued, running, completed, error)

mod job_status;
mod stage;

// Re-export main types
pub use job_status::JobStatus;
pub use stage::AnalysisStage;
