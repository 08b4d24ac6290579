//! Worker pool consuming the analysis queue

use crate::analyzer::{Analyzer, CrawlResult};
use crate::config::QueueConfig;
use crate::state::JobStatus;
use crate::{ErrorKind, QueueError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Identifier assigned to each submitted job, increasing from 1
pub type JobId = u64;

/// Error detail recorded for jobs dropped by cancellation before a worker
/// picked them up
pub const CANCELLED_BEFORE_START: &str = "analysis cancelled before it started";

/// A target waiting for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisJob {
    pub id: JobId,
    pub target: String,
}

/// Final outcome attached to a terminal event
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed(CrawlResult),
    Failed { kind: ErrorKind, message: String },
}

/// A status change of one job
#[derive(Debug, Clone)]
pub struct JobEvent {
    pub job_id: JobId,
    pub target: String,
    pub status: JobStatus,
    pub at: DateTime<Utc>,

    /// Present on `Completed` and `Error` events only
    pub outcome: Option<JobOutcome>,
}

impl JobEvent {
    fn new(job: &AnalysisJob, status: JobStatus, outcome: Option<JobOutcome>) -> Self {
        Self {
            job_id: job.id,
            target: job.target.clone(),
            status,
            at: Utc::now(),
            outcome,
        }
    }
}

/// Bounded job queue with a fixed pool of analysis workers
///
/// Submitting waits while the queue is full, so a fast producer is slowed to
/// the pace of the workers instead of piling up unbounded work.
pub struct AnalysisQueue {
    sender: mpsc::Sender<AnalysisJob>,
    events: mpsc::UnboundedSender<JobEvent>,
    workers: JoinSet<()>,
    next_id: AtomicU64,
    cancel: CancellationToken,
}

impl AnalysisQueue {
    /// Spawns the worker pool
    ///
    /// Returns the queue handle and the receiving end of the event stream.
    /// The stream ends once the queue has been joined and every worker has
    /// exited.
    pub fn start(
        analyzer: Arc<Analyzer>,
        config: &QueueConfig,
    ) -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (sender, receiver) = mpsc::channel(config.capacity.max(1) as usize);
        let (events, event_receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));
        let cancel = CancellationToken::new();

        let worker_count = config.workers.max(1);
        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&analyzer),
                Arc::clone(&receiver),
                events.clone(),
                cancel.clone(),
            ));
        }

        tracing::info!(
            "Started analysis queue: {} workers, capacity {}",
            worker_count,
            config.capacity
        );

        let queue = Self {
            sender,
            events,
            workers,
            next_id: AtomicU64::new(1),
            cancel,
        };
        (queue, event_receiver)
    }

    /// Submits a target, waiting for room in the queue
    pub async fn submit(&self, target: &str) -> Result<JobId, QueueError> {
        let permit = self.sender.reserve().await.map_err(|_| QueueError::Closed)?;
        let job = self.new_job(target);
        let id = job.id;
        self.emit_queued(&job);
        permit.send(job);
        Ok(id)
    }

    /// Submits a target without waiting
    ///
    /// Fails with [`QueueError::Full`] when every slot is taken.
    pub fn try_submit(&self, target: &str) -> Result<JobId, QueueError> {
        let permit = self.sender.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => QueueError::Full,
            TrySendError::Closed(()) => QueueError::Closed,
        })?;
        let job = self.new_job(target);
        let id = job.id;
        self.emit_queued(&job);
        permit.send(job);
        Ok(id)
    }

    /// Cancels running analyses and every job not yet started
    ///
    /// Running analyses stop at their next suspension point. Jobs still in
    /// the queue finish as `error` without any request being made.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            tracing::warn!("Cancelling analysis queue");
        }
        self.cancel.cancel();
    }

    /// Token shared by every analysis this queue runs
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Closes the queue and waits until every submitted job has finished
    pub async fn join(self) {
        let Self {
            sender,
            events,
            mut workers,
            ..
        } = self;
        drop(sender);
        drop(events);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Analysis worker failed: {}", e);
            }
        }
        tracing::debug!("Analysis queue drained");
    }

    /// Cancels outstanding work, then joins the workers
    pub async fn shutdown(self) {
        self.cancel();
        self.join().await;
    }

    fn new_job(&self, target: &str) -> AnalysisJob {
        AnalysisJob {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            target: target.to_string(),
        }
    }

    fn emit_queued(&self, job: &AnalysisJob) {
        tracing::debug!("Queued job {} for {}", job.id, job.target);
        let _ = self.events.send(JobEvent::new(job, JobStatus::Queued, None));
    }
}

/// Worker loop: takes jobs until the queue is closed and empty
async fn run_worker(
    worker_id: u32,
    analyzer: Arc<Analyzer>,
    jobs: Arc<Mutex<mpsc::Receiver<AnalysisJob>>>,
    events: mpsc::UnboundedSender<JobEvent>,
    cancel: CancellationToken,
) {
    loop {
        let job = {
            let mut jobs = jobs.lock().await;
            jobs.recv().await
        };
        let Some(job) = job else {
            break;
        };

        if cancel.is_cancelled() {
            let outcome = JobOutcome::Failed {
                kind: ErrorKind::Transport,
                message: CANCELLED_BEFORE_START.to_string(),
            };
            let _ = events.send(JobEvent::new(&job, JobStatus::Error, Some(outcome)));
            continue;
        }

        tracing::debug!("Worker {} running job {}", worker_id, job.id);
        let _ = events.send(JobEvent::new(&job, JobStatus::Running, None));

        let event = match analyzer.analyze_with_cancellation(&job.target, &cancel).await {
            Ok(result) => JobEvent::new(
                &job,
                JobStatus::Completed,
                Some(JobOutcome::Completed(result)),
            ),
            Err(e) => {
                tracing::warn!("Job {} ({}) failed: {}", job.id, job.target, e);
                JobEvent::new(
                    &job,
                    JobStatus::Error,
                    Some(JobOutcome::Failed {
                        kind: e.kind(),
                        message: e.to_string(),
                    }),
                )
            }
        };
        let _ = events.send(event);
    }

    tracing::debug!("Worker {} exiting", worker_id);
}
