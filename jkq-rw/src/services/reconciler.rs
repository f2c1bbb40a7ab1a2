//! Dataset reconciliation
//!
//! Matches a parsed report against dataset records by question text and
//! applies the repair pipeline (normalize, maybe quarantine, enrich) to
//! every match.

use std::fmt;

use jkq_common::store::QuestionStore;
use jkq_common::{QuestionRecord, Report, Result};
use tracing::{debug, info};

use super::audit_log::{AuditEntry, AuditLog};
use super::enricher::enrich_alternatives;
use super::normalizer::normalize_question;
use super::reason::classify_reason;

/// Truncation bound for the quarantine annotation.
const REPORT_FLAG_REASON_CHARS: usize = 120;

/// Terminal status of one report application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// At least one record was updated.
    Ok,
    /// The report's question matched no record.
    QuestionNotFound,
    /// The report carried no question to match on.
    NoQuestionInReport,
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApplyStatus::Ok => "ok",
            ApplyStatus::QuestionNotFound => "question_not_found",
            ApplyStatus::NoQuestionInReport => "no_question_in_report",
        };
        f.write_str(s)
    }
}

/// Apply a report to an in-memory record list.
///
/// A record matches when its canonical question text, trimmed and
/// case-insensitive, equals the report's question. Matching is not assumed
/// unique; every match is updated in the same pass.
pub fn apply_to_records(report: &Report, records: &mut [QuestionRecord]) -> (usize, ApplyStatus) {
    let target = report.question.trim().to_lowercase();
    if target.is_empty() {
        return (0, ApplyStatus::NoQuestionInReport);
    }

    let reason_category = classify_reason(&report.reason);
    let mut changed = 0usize;

    for record in records.iter_mut() {
        if record.display_question().trim().to_lowercase() != target {
            continue;
        }

        let old = record.display_question().to_string();
        let new = normalize_question(&old, &record.antwort);
        record.set_question_text(&new);

        // A reported question the rule chain could not rewrite needs a
        // human; pull it from publication instead of dropping the report.
        if new == old && reason_category.is_some() {
            record.pdf_eligible = Some(false);
            record.report_flag = Some(quarantine_flag(&report.reason));
        }

        enrich_alternatives(record);
        changed += 1;
    }

    let status = if changed > 0 {
        ApplyStatus::Ok
    } else {
        ApplyStatus::QuestionNotFound
    };
    (changed, status)
}

fn quarantine_flag(reason: &str) -> String {
    let truncated: String = reason.chars().take(REPORT_FLAG_REASON_CHARS).collect();
    format!("AUTO_REVIEW:{truncated}")
}

/// Reconciler owning the persistence side effects around
/// [`apply_to_records`].
pub struct Reconciler {
    store: QuestionStore,
    audit: AuditLog,
}

impl Reconciler {
    pub fn new(store: QuestionStore, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    /// Apply one report against the stored dataset.
    ///
    /// The dataset file is rewritten, and an audit entry appended, only
    /// when at least one record changed. A zero-match report leaves the
    /// file byte-for-byte untouched.
    pub fn apply(&self, report: &Report) -> Result<(usize, ApplyStatus)> {
        let mut records = self.store.load()?;
        let (changed, status) = apply_to_records(report, &mut records);

        if changed > 0 {
            self.store.save(&records)?;
            self.audit
                .append(&AuditEntry::new(report.clone(), changed))?;
            info!(changed, "Dataset updated from report");
        } else {
            debug!(status = %status, "Report produced no dataset change");
        }

        Ok((changed, status))
    }
}
