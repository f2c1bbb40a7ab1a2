//! Directory-backed report source
//!
//! Reads plain-text message files from an inbox directory and moves
//! acknowledged ones into a `seen/` subdirectory. A message file is a
//! minimal header block (`Subject:`, `Message-ID:`, optional
//! `Content-Type:` carrying a charset parameter), a blank line, then the
//! body.

use std::fs;
use std::path::{Path, PathBuf};

use jkq_common::Result;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::{IncomingMessage, ReportSource};

const SEEN_DIR: &str = "seen";

/// Directory drop-box of report messages.
pub struct MaildirSource {
    inbox: PathBuf,
    /// Only messages whose subject starts with this prefix are delivered.
    /// Empty delivers everything.
    subject_prefix: String,
}

impl MaildirSource {
    pub fn new(inbox: impl Into<PathBuf>, subject_prefix: impl Into<String>) -> Self {
        Self {
            inbox: inbox.into(),
            subject_prefix: subject_prefix.into(),
        }
    }

    /// Message files in the inbox, sorted by file name for a deterministic
    /// batch order. An absent inbox is an empty batch, not an error.
    fn message_files(&self) -> Result<Vec<PathBuf>> {
        if !self.inbox.is_dir() {
            debug!(inbox = %self.inbox.display(), "Inbox directory missing, nothing to fetch");
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.inbox)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_message(&self, path: &Path) -> Result<IncomingMessage> {
        let raw = fs::read(path)?;
        let (headers, body) = split_headers(&raw);
        let headers = parse_headers(headers);
        let id = headers
            .message_id
            .unwrap_or_else(|| content_hash_id(&raw));
        Ok(IncomingMessage {
            id,
            subject: headers.subject,
            raw_body: body.to_vec(),
            charset: headers.charset,
        })
    }

    fn matches_subject(&self, subject: &str) -> bool {
        self.subject_prefix.is_empty() || subject.starts_with(&self.subject_prefix)
    }
}

impl ReportSource for MaildirSource {
    fn fetch(&self) -> Result<Vec<IncomingMessage>> {
        let mut messages = Vec::new();
        for path in self.message_files()? {
            let message = self.read_message(&path)?;
            if !self.matches_subject(&message.subject) {
                debug!(
                    file = %path.display(),
                    subject = %message.subject,
                    "Subject does not match the configured prefix, skipping"
                );
                continue;
            }
            messages.push(message);
        }
        Ok(messages)
    }

    fn mark_seen(&self, id: &str) -> Result<()> {
        for path in self.message_files()? {
            let message = self.read_message(&path)?;
            if message.id != id {
                continue;
            }
            let seen_dir = self.inbox.join(SEEN_DIR);
            fs::create_dir_all(&seen_dir)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "message".into());
            fs::rename(&path, seen_dir.join(file_name))?;
            return Ok(());
        }
        // Already moved, or delivered by an earlier run; nothing to do.
        warn!(id, "No inbox file for acknowledged message");
        Ok(())
    }
}

struct MessageHeaders {
    message_id: Option<String>,
    subject: String,
    charset: Option<String>,
}

/// Split raw bytes at the first blank line into (header text, body bytes).
/// Headers are treated as lossy UTF-8; the body stays raw for charset-aware
/// decoding later.
fn split_headers(raw: &[u8]) -> (String, &[u8]) {
    for (sep, len) in [(&b"\r\n\r\n"[..], 4), (&b"\n\n"[..], 2)] {
        if let Some(pos) = raw.windows(len).position(|w| w == sep) {
            let headers = String::from_utf8_lossy(&raw[..pos]).into_owned();
            return (headers, &raw[pos + len..]);
        }
    }
    // No blank line: the whole file is headers with an empty body.
    (String::from_utf8_lossy(raw).into_owned(), &[])
}

fn parse_headers(headers: String) -> MessageHeaders {
    let mut message_id = None;
    let mut subject = String::new();
    let mut charset = None;

    for line in headers.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.trim().to_lowercase().as_str() {
            "message-id" => {
                if !value.is_empty() {
                    message_id = Some(value.to_string());
                }
            }
            "subject" => subject = value.to_string(),
            "content-type" => charset = extract_charset(value),
            _ => {}
        }
    }

    MessageHeaders {
        message_id,
        subject,
        charset,
    }
}

/// Pull the `charset=` parameter out of a Content-Type value.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// Fallback identifier for messages without a Message-ID header.
fn content_hash_id(raw: &[u8]) -> String {
    let hash = Sha256::digest(raw);
    format!("file:{:x}", hash)[..21].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_message(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    const MESSAGE: &str = "\
Subject: Jagdkurs Meldung: Frage gemeldet
Message-ID: <report-1@example.org>
Content-Type: text/plain; charset=\"utf-8\"

Frage: Was ist Niederwild?
Antwort: Feldhase
";

    #[test]
    fn fetch_parses_headers_and_body() {
        let dir = tempfile::tempdir().unwrap();
        write_message(dir.path(), "001.msg", MESSAGE);

        let source = MaildirSource::new(dir.path(), "Jagdkurs Meldung:");
        let messages = source.fetch().unwrap();
        assert_eq!(messages.len(), 1);

        let message = &messages[0];
        assert_eq!(message.id, "<report-1@example.org>");
        assert_eq!(message.subject, "Jagdkurs Meldung: Frage gemeldet");
        assert_eq!(message.charset.as_deref(), Some("utf-8"));
        let body = String::from_utf8_lossy(&message.raw_body);
        assert!(body.starts_with("Frage: Was ist Niederwild?"));
    }

    #[test]
    fn fetch_filters_by_subject_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_message(dir.path(), "001.msg", MESSAGE);
        write_message(
            dir.path(),
            "002.msg",
            "Subject: Newsletter\n\nFrage: egal?\n",
        );

        let source = MaildirSource::new(dir.path(), "Jagdkurs Meldung:");
        let messages = source.fetch().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "<report-1@example.org>");
    }

    #[test]
    fn fetch_orders_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_message(
            dir.path(),
            "b.msg",
            "Subject: Jagdkurs Meldung: B\nMessage-ID: <b>\n\nx\n",
        );
        write_message(
            dir.path(),
            "a.msg",
            "Subject: Jagdkurs Meldung: A\nMessage-ID: <a>\n\nx\n",
        );

        let source = MaildirSource::new(dir.path(), "Jagdkurs Meldung:");
        let ids: Vec<String> = source.fetch().unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["<a>", "<b>"]);
    }

    #[test]
    fn missing_message_id_falls_back_to_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        write_message(
            dir.path(),
            "001.msg",
            "Subject: Jagdkurs Meldung: X\n\nFrage: Was?\n",
        );

        let source = MaildirSource::new(dir.path(), "");
        let messages = source.fetch().unwrap();
        assert!(messages[0].id.starts_with("file:"));
        assert_eq!(messages[0].id.len(), 21);

        // Deterministic: the same content maps to the same identifier.
        let again = source.fetch().unwrap();
        assert_eq!(messages[0].id, again[0].id);
    }

    #[test]
    fn mark_seen_moves_the_file_out_of_the_inbox() {
        let dir = tempfile::tempdir().unwrap();
        write_message(dir.path(), "001.msg", MESSAGE);

        let source = MaildirSource::new(dir.path(), "");
        source.mark_seen("<report-1@example.org>").unwrap();

        assert!(!dir.path().join("001.msg").exists());
        assert!(dir.path().join(SEEN_DIR).join("001.msg").exists());
        assert!(source.fetch().unwrap().is_empty());
    }

    #[test]
    fn mark_seen_unknown_id_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = MaildirSource::new(dir.path(), "");
        source.mark_seen("<gone@example.org>").unwrap();
    }

    #[test]
    fn missing_inbox_is_an_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = MaildirSource::new(dir.path().join("nope"), "");
        assert!(source.fetch().unwrap().is_empty());
    }
}
