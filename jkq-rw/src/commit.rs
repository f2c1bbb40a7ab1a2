//! Post-run commit signaling
//!
//! After a batch the worker reports the aggregate changed count to a
//! `CommitSink`; whether and how that becomes a durable commit is the
//! sink's business, not the pipeline's.

use std::path::PathBuf;
use std::process::Command;

use jkq_common::Result;
use tracing::{debug, info, warn};

/// Collaborator receiving the post-run change signal.
pub trait CommitSink {
    fn notify(&self, total_changed: usize) -> Result<()>;
}

/// Default sink: log the signal and do nothing.
pub struct NullCommitSink;

impl CommitSink for NullCommitSink {
    fn notify(&self, total_changed: usize) -> Result<()> {
        debug!(total_changed, "Commit sink disabled, not committing");
        Ok(())
    }
}

/// Commits the dataset and audit log to the surrounding git repository and
/// pushes. Every step is best-effort: a failing add, commit (e.g. nothing
/// staged) or push is logged, not escalated.
pub struct GitCommitSink {
    repo_root: PathBuf,
    paths: Vec<PathBuf>,
}

impl GitCommitSink {
    pub fn new(repo_root: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            paths,
        }
    }
}

impl CommitSink for GitCommitSink {
    fn notify(&self, total_changed: usize) -> Result<()> {
        if total_changed == 0 {
            return Ok(());
        }

        let add_status = Command::new("git")
            .arg("add")
            .args(&self.paths)
            .current_dir(&self.repo_root)
            .status()?;
        if !add_status.success() {
            warn!(%add_status, "git add failed");
        }

        let message =
            format!("chore: auto-fix reported questions ({total_changed} question updates)");
        let commit_status = Command::new("git")
            .args(["commit", "-m", &message])
            .current_dir(&self.repo_root)
            .status()?;
        if !commit_status.success() {
            warn!(%commit_status, "git commit failed, skipping push");
            return Ok(());
        }

        let push_status = Command::new("git")
            .arg("push")
            .current_dir(&self.repo_root)
            .status()?;
        if push_status.success() {
            info!(total_changed, "Dataset changes committed and pushed");
        } else {
            warn!(%push_status, "git push failed");
        }
        Ok(())
    }
}
