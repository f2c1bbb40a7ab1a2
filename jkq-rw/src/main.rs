//! jkq-rw - Report Worker
//!
//! Scans an inbox of question reports, repairs the matching dataset
//! records through the normalization pipeline, and records every change.
//! One-shot by default; `--watch` repeats the scan on a fixed interval so
//! overlapping windows tolerate crashes and restarts without an external
//! scheduler.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use jkq_common::config::{self, WorkerConfig};
use jkq_common::store::QuestionStore;
use jkq_rw::commit::{CommitSink, GitCommitSink, NullCommitSink};
use jkq_rw::services::audit_log::AuditLog;
use jkq_rw::services::reconciler::Reconciler;
use jkq_rw::services::state_tracker::StateTracker;
use jkq_rw::source::MaildirSource;
use jkq_rw::worker::ReportWorker;

#[derive(Debug, Parser)]
#[command(name = "jkq-rw", about = "Process question reports and auto-fix the quiz dataset")]
struct Args {
    /// Root folder holding the dataset, inbox and state
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep running, rescanning the inbox on a fixed interval
    #[arg(long)]
    watch: bool,

    /// Commit and push dataset changes after a run
    #[arg(long)]
    commit: bool,

    /// Override the watch interval in seconds
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting jkq-rw (Report Worker)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => WorkerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WorkerConfig::load_default().context("loading default config")?,
    };

    let root = config::resolve_root_folder(args.root_folder.as_deref(), &config);
    info!("Root folder: {}", root.display());

    let paths = config.paths(&root);
    info!("Dataset: {}", paths.dataset_file.display());
    info!("Inbox: {}", paths.inbox_dir.display());

    let commit: Box<dyn CommitSink> = if args.commit || config.auto_commit {
        Box::new(GitCommitSink::new(
            root.clone(),
            vec![paths.dataset_file.clone(), paths.audit_log.clone()],
        ))
    } else {
        Box::new(NullCommitSink)
    };

    let source = MaildirSource::new(paths.inbox_dir.clone(), config.subject_prefix.clone());
    let reconciler = Reconciler::new(
        QuestionStore::new(paths.dataset_file.clone()),
        AuditLog::new(paths.audit_log.clone()),
    );
    let tracker = StateTracker::new(paths.state_file.clone());
    let worker = ReportWorker::new(source, reconciler, tracker, commit);

    if args.watch {
        let interval_secs = args.interval_secs.unwrap_or(config.scan_interval_secs).max(1);
        info!(interval_secs, "Watch mode: rescanning on a fixed interval");
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A failed batch is retried at the next tick; the state
                    // tracker makes the overlap harmless.
                    if let Err(e) = worker.run_batch() {
                        error!("Batch failed: {e}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutting down");
                    break;
                }
            }
        }
    } else {
        let summary = worker.run_batch().context("batch run failed")?;
        info!(
            updated = summary.total_changed,
            messages = summary.messages_seen,
            "Run complete"
        );
    }

    Ok(())
}
