//! Statistics over a batch of analysis jobs
//!
//! This module provides the totals shown after a run: jobs by status,
//! failures by kind, and link and broken-link counts.

use crate::queue::JobRecord;
use crate::state::JobStatus;
use crate::ErrorKind;
use serde::Serialize;
use std::collections::HashMap;

/// Batch statistics summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStatistics {
    /// Total number of jobs
    pub total_jobs: u64,

    /// Count of jobs by status
    pub jobs_by_status: HashMap<JobStatus, u64>,

    /// Failed jobs grouped by error kind
    pub errors_by_kind: HashMap<ErrorKind, u64>,

    /// Links found across completed jobs
    pub total_links: u64,

    /// Broken links found across completed jobs
    pub total_broken_links: u64,
}

impl BatchStatistics {
    /// Computes statistics from job records
    pub fn from_records(records: &[JobRecord]) -> Self {
        let mut stats = Self {
            total_jobs: records.len() as u64,
            ..Self::default()
        };

        for record in records {
            *stats.jobs_by_status.entry(record.status).or_insert(0) += 1;

            if let Some(kind) = record.error_kind {
                *stats.errors_by_kind.entry(kind).or_insert(0) += 1;
            }

            if let Some(result) = &record.result {
                stats.total_links += result.total_links() as u64;
                stats.total_broken_links += result.broken_count() as u64;
            }
        }

        stats
    }

    /// Number of jobs in the given status
    pub fn count(&self, status: JobStatus) -> u64 {
        self.jobs_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Share of jobs that completed, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_jobs == 0 {
            return 0.0;
        }
        (self.count(JobStatus::Completed) as f64 / self.total_jobs as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &BatchStatistics) {
    println!("=== Analysis Statistics ===\n");

    println!("Overview:");
    println!("  Pages analyzed: {}", stats.total_jobs);
    println!("  Total links found: {}", stats.total_links);
    println!("  Broken links: {}", stats.total_broken_links);
    println!();

    println!("Jobs by Status:");
    for status in JobStatus::all_states() {
        let count = stats.count(status);
        if count > 0 {
            println!("  {}: {}", status, count);
        }
    }
    println!();

    if !stats.errors_by_kind.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.errors_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages analyzed)",
        stats.success_rate(),
        stats.count(JobStatus::Completed),
        stats.total_jobs
    );
}
