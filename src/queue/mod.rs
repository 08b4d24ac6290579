//! Job queue for page analyses
//!
//! Callers submit targets to a bounded queue; a fixed pool of worker tasks
//! consumes it and runs each analysis. Progress is reported as a stream of
//! [`JobEvent`]s which [`JobRecord`] folds into the row-shaped record a
//! storing layer keeps.
//!
//! # Example
//!
//! ```no_run
//! use page_analyzer::config::QueueConfig;
//! use page_analyzer::queue::{records_from_events, AnalysisQueue};
//! use page_analyzer::{Analyzer, AnalyzerConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let analyzer = Arc::new(Analyzer::new(AnalyzerConfig::default())?);
//! let (queue, mut events) = AnalysisQueue::start(analyzer, &QueueConfig::default());
//!
//! queue.submit("example.com").await?;
//! queue.join().await;
//!
//! let mut collected = Vec::new();
//! while let Some(event) = events.recv().await {
//!     collected.push(event);
//! }
//! for record in records_from_events(collected) {
//!     println!("{} {}", record.url, record.status);
//! }
//! # Ok(())
//! # }
//! ```

mod record;
mod worker;

pub use record::{records_from_events, JobRecord};
pub use worker::{AnalysisJob, AnalysisQueue, JobEvent, JobId, JobOutcome, CANCELLED_BEFORE_START};
