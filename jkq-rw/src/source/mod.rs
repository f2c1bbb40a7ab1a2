//! Incoming report sources
//!
//! The worker consumes an ordered sequence of raw messages from a
//! `ReportSource`; the transport behind it (a mailbox, a directory drop) is
//! deliberately outside the pipeline.

pub mod maildir;

pub use maildir::MaildirSource;

use jkq_common::Result;

/// One raw message delivered by a source.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Stable identifier used for idempotency tracking.
    pub id: String,
    pub subject: String,
    pub raw_body: Vec<u8>,
    /// Declared body charset, when the transport knows one.
    pub charset: Option<String>,
}

/// Transport seam delivering raw report messages.
pub trait ReportSource {
    /// Fetch the current batch of candidate messages, oldest first.
    fn fetch(&self) -> Result<Vec<IncomingMessage>>;

    /// Acknowledge a message so later fetches no longer return it.
    /// Acknowledging an unknown or already-acknowledged identifier is not
    /// an error.
    fn mark_seen(&self, id: &str) -> Result<()>;
}
