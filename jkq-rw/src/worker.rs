//! Batch orchestration
//!
//! Drives one end-to-end pass: load processed state, fetch messages, run
//! each unseen report through the pipeline, acknowledge it, then persist
//! state and signal the commit sink.

use jkq_common::Result;
use tracing::{debug, info};

use crate::commit::CommitSink;
use crate::services::reconciler::{ApplyStatus, Reconciler};
use crate::services::report_parser::{decode_body, parse_report};
use crate::services::state_tracker::StateTracker;
use crate::source::ReportSource;

/// Outcome of one message in a batch.
#[derive(Debug, Clone)]
pub struct MessageOutcome {
    pub id: String,
    pub subject: String,
    /// `None` when the message was skipped as already processed.
    pub status: Option<ApplyStatus>,
    pub changed: usize,
    pub already_processed: bool,
}

/// Aggregate result of one batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub messages_seen: usize,
    pub total_changed: usize,
    pub outcomes: Vec<MessageOutcome>,
}

/// Sequential report worker. One writer, no concurrency; each report is
/// fully handled before the next one is considered.
pub struct ReportWorker<S> {
    source: S,
    reconciler: Reconciler,
    tracker: StateTracker,
    commit: Box<dyn CommitSink>,
}

impl<S: ReportSource> ReportWorker<S> {
    pub fn new(
        source: S,
        reconciler: Reconciler,
        tracker: StateTracker,
        commit: Box<dyn CommitSink>,
    ) -> Self {
        Self {
            source,
            reconciler,
            tracker,
            commit,
        }
    }

    /// Run one batch over everything the source currently delivers.
    ///
    /// Transport or storage failures abort the batch before the state save,
    /// which makes a re-run safe: matching is driven by current question
    /// text, so reapplying a half-finished batch converges to the same
    /// dataset.
    pub fn run_batch(&self) -> Result<RunSummary> {
        let mut state = self.tracker.load()?;
        let messages = self.source.fetch()?;
        info!(count = messages.len(), "Fetched report messages");

        let mut summary = RunSummary {
            messages_seen: messages.len(),
            ..RunSummary::default()
        };

        for message in &messages {
            if state.contains(&message.id) {
                debug!(id = %message.id, "Already processed, skipping");
                self.source.mark_seen(&message.id)?;
                summary.outcomes.push(MessageOutcome {
                    id: message.id.clone(),
                    subject: message.subject.clone(),
                    status: None,
                    changed: 0,
                    already_processed: true,
                });
                continue;
            }

            let body = decode_body(&message.raw_body, message.charset.as_deref());
            let report = parse_report(&body);
            let (changed, status) = self.reconciler.apply(&report)?;
            summary.total_changed += changed;

            info!(
                subject = %message.subject,
                status = %status,
                changed,
                "Report processed"
            );

            state.insert(&message.id);
            self.source.mark_seen(&message.id)?;
            summary.outcomes.push(MessageOutcome {
                id: message.id.clone(),
                subject: message.subject.clone(),
                status: Some(status),
                changed,
                already_processed: false,
            });
        }

        self.tracker.save(&state)?;

        if summary.total_changed > 0 {
            self.commit.notify(summary.total_changed)?;
        }

        info!(
            updated = summary.total_changed,
            messages = summary.messages_seen,
            "Batch complete"
        );
        Ok(summary)
    }
}
