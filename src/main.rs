//! Page Analyzer main entry point
//!
//! This is the command-line interface for the page analyzer.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use page_analyzer::config::{load_config_with_hash, validate};
use page_analyzer::output::{print_statistics, write_report, BatchStatistics, ReportFormat};
use page_analyzer::queue::records_from_events;
use page_analyzer::{parse_target, AnalysisQueue, Analyzer, AnalyzerConfig, JobStatus};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Page Analyzer: structure and link health for single web pages
///
/// Each URL is downloaded once. The report lists its title, heading counts,
/// doctype, login form presence, internal/external link counts, and every
/// link that failed a HEAD check.
#[derive(Parser, Debug)]
#[command(name = "page-analyzer")]
#[command(version = "1.0.0")]
#[command(about = "Analyze web pages and check their links", long_about = None)]
struct Cli {
    /// Pages to analyze; https:// is assumed when no scheme is given
    #[arg(value_name = "URL", required = true)]
    targets: Vec<String>,

    /// Path to TOML configuration file (defaults are used otherwise)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print batch statistics after the report
    #[arg(long)]
    stats: bool,

    /// Validate config and targets and show the plan without any network access
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.targets)
    } else {
        handle_analysis(config, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_analyzer=info,warn"),
            1 => EnvFilter::new("page_analyzer=debug,info"),
            2 => EnvFilter::new("page_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or validated defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<AnalyzerConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            let config = AnalyzerConfig::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: validates config and targets, no requests
fn handle_dry_run(config: &AnalyzerConfig, targets: &[String]) -> anyhow::Result<()> {
    println!("=== Page Analyzer Dry Run ===\n");

    println!("Configuration:");
    let rendered = toml::to_string_pretty(config).context("failed to render configuration")?;
    for line in rendered.lines() {
        println!("  {}", line);
    }

    println!("\nTargets ({}):", targets.len());
    let mut invalid = 0;
    for target in targets {
        match parse_target(target) {
            Ok(url) => println!("  ✓ {}", url),
            Err(e) => {
                invalid += 1;
                println!("  ✗ {}: {}", target, e);
            }
        }
    }

    println!("\n✓ Configuration is valid");
    if invalid > 0 {
        anyhow::bail!("{} of {} targets are invalid", invalid, targets.len());
    }
    println!(
        "✓ Would analyze {} pages with {} workers",
        targets.len(),
        config.queue.workers
    );

    Ok(())
}

/// Handles the main analysis run
async fn handle_analysis(config: AnalyzerConfig, cli: &Cli) -> anyhow::Result<()> {
    let queue_config = config.queue.clone();
    let analyzer = Arc::new(Analyzer::new(config)?);
    let (queue, mut events) = AnalysisQueue::start(analyzer, &queue_config);

    // Ctrl-C cancels outstanding work; whatever finished is still reported
    let cancel = queue.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling outstanding analyses");
            cancel.cancel();
        }
    });

    let collector = tokio::spawn(async move {
        let mut collected = Vec::new();
        while let Some(event) = events.recv().await {
            match event.status {
                JobStatus::Completed | JobStatus::Error => {
                    tracing::info!("[{}] {} {}", event.job_id, event.target, event.status)
                }
                _ => tracing::debug!("[{}] {} {}", event.job_id, event.target, event.status),
            }
            collected.push(event);
        }
        collected
    });

    tracing::info!("Submitting {} targets", cli.targets.len());
    for target in &cli.targets {
        queue.submit(target).await?;
    }
    queue.join().await;

    let events = collector.await.context("event collector failed")?;
    let records = records_from_events(events);

    write_report(&records, cli.format.into(), cli.output.as_deref())?;

    let stats = BatchStatistics::from_records(&records);
    if cli.stats {
        println!();
        print_statistics(&stats);
    }

    let failed = stats.count(JobStatus::Error);
    if failed > 0 {
        tracing::warn!("{} of {} analyses failed", failed, stats.total_jobs);
    } else {
        tracing::info!("All {} analyses completed", stats.total_jobs);
    }

    Ok(())
}
