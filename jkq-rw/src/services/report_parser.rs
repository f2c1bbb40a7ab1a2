//! Report body parsing
//!
//! Turns a raw message body into a structured `Report`. One field per line,
//! `label: value`; lines without a separator and unknown labels are
//! ignored, the last occurrence of a label wins. Parsing never fails; a
//! malformed body just yields a weaker report.

use std::collections::HashMap;

use jkq_common::Report;
use tracing::warn;

/// Placeholder token reporters use for "no alternative".
const EMPTY_ALTERNATIVE: &str = "-";

/// Extract a `Report` from a plain-text body.
pub fn parse_report(body: &str) -> Report {
    let mut fields: HashMap<String, String> = HashMap::new();
    for line in body.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        fields.insert(key.trim().to_lowercase(), value.trim().to_string());
    }

    let field = |label: &str| fields.get(label).cloned().unwrap_or_default();

    let alternatives = fields
        .get("alternativen")
        .map(|raw| split_alternatives(raw))
        .unwrap_or_default();

    Report {
        subject: field("fach"),
        mode: field("modus"),
        question: field("frage"),
        answer: field("antwort"),
        alternatives,
        reason: field("grund"),
        time: field("zeit"),
    }
}

fn split_alternatives(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty() && *token != EMPTY_ALTERNATIVE)
        .map(str::to_string)
        .collect()
}

/// Decode a raw message body using its declared charset.
///
/// UTF-8 (lossy) unless the charset names the Latin-1 family, which decodes
/// each byte as the matching code point. Unknown charsets fall back to
/// lossy UTF-8.
pub fn decode_body(raw: &[u8], declared_charset: Option<&str>) -> String {
    let charset = declared_charset.map(|c| c.trim().to_lowercase());
    match charset.as_deref() {
        // windows-1252 differs from latin-1 only in the 0x80..0x9F range;
        // close enough for report bodies.
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "windows-1252") => {
            raw.iter().map(|&b| b as char).collect()
        }
        Some("utf-8" | "utf8" | "us-ascii" | "ascii") | None => {
            String::from_utf8_lossy(raw).into_owned()
        }
        Some(other) => {
            warn!(charset = other, "Unknown charset, decoding as UTF-8");
            String::from_utf8_lossy(raw).into_owned()
        }
    }
}
