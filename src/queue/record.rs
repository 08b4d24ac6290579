//! Row-shaped job records built from queue events

use crate::analyzer::CrawlResult;
use crate::queue::worker::{JobEvent, JobId, JobOutcome};
use crate::state::JobStatus;
use crate::{ErrorKind, QueueError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything a storing layer keeps about one analysis job
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: JobId,

    /// Target exactly as submitted
    pub url: String,

    pub status: JobStatus,
    pub error_kind: Option<ErrorKind>,
    pub error_message: Option<String>,
    pub result: Option<CrawlResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Creates a record in the `queued` state
    pub fn queued(id: JobId, url: &str, at: DateTime<Utc>) -> Self {
        Self {
            id,
            url: url.to_string(),
            status: JobStatus::Queued,
            error_kind: None,
            error_message: None,
            result: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Applies a status change
    ///
    /// Returning to `queued` (reanalysis) clears the previous outcome.
    pub fn apply(&mut self, event: JobEvent) -> Result<(), QueueError> {
        if !self.status.can_transition_to(event.status) {
            return Err(QueueError::InvalidTransition {
                from: self.status,
                to: event.status,
            });
        }

        self.status = event.status;
        self.updated_at = event.at;

        match event.outcome {
            Some(JobOutcome::Completed(result)) => {
                self.result = Some(result);
                self.error_kind = None;
                self.error_message = None;
            }
            Some(JobOutcome::Failed { kind, message }) => {
                self.result = None;
                self.error_kind = Some(kind);
                self.error_message = Some(message);
            }
            None if event.status == JobStatus::Queued => {
                self.result = None;
                self.error_kind = None;
                self.error_message = None;
            }
            None => {}
        }

        Ok(())
    }

    /// Number of broken links found, if the job completed
    pub fn broken_count(&self) -> Option<usize> {
        self.result.as_ref().map(CrawlResult::broken_count)
    }
}

/// Folds an event stream into one record per job, ordered by job id
///
/// Events that do not fit a record's lifecycle are logged and skipped.
pub fn records_from_events(events: impl IntoIterator<Item = JobEvent>) -> Vec<JobRecord> {
    let mut records: BTreeMap<JobId, JobRecord> = BTreeMap::new();

    for event in events {
        match records.get_mut(&event.job_id) {
            Some(record) => {
                let job_id = event.job_id;
                if let Err(e) = record.apply(event) {
                    tracing::warn!("Ignoring event for job {}: {}", job_id, e);
                }
            }
            None if event.status == JobStatus::Queued => {
                records.insert(
                    event.job_id,
                    JobRecord::queued(event.job_id, &event.target, event.at),
                );
            }
            None => {
                tracing::warn!(
                    "Ignoring {} event for unknown job {}",
                    event.status,
                    event.job_id
                );
            }
        }
    }

    records.into_values().collect()
}
