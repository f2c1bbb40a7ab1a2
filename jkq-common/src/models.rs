//! Data models shared across the JKQ tools

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in the persisted question dataset.
///
/// Field names mirror the dataset's German JSON keys. `Frage`,
/// `FrageFreitext` and `FrageMC` are three aliases of one logical display
/// text, kept in sync for backward compatibility with older readers.
///
/// Fields this tooling never touches (`FalscheAntwort1..3`, `Pruefungsfach`,
/// `Difficulty`, `Tags`, anything added later) are captured in `extra` so a
/// full-file rewrite preserves them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "Frage", default)]
    pub frage: String,

    #[serde(
        rename = "FrageFreitext",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub frage_freitext: Option<String>,

    #[serde(rename = "FrageMC", default, skip_serializing_if = "Option::is_none")]
    pub frage_mc: Option<String>,

    #[serde(rename = "Antwort", default)]
    pub antwort: String,

    /// Distractor answers, most relevant first. Never contains the record's
    /// own answer, never more than eight entries.
    #[serde(
        rename = "AlternativeAntworten",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternative_antworten: Vec<String>,

    /// Publication eligibility; cleared when the record is quarantined.
    /// Absent means eligible.
    #[serde(rename = "PdfEligible", default, skip_serializing_if = "Option::is_none")]
    pub pdf_eligible: Option<bool>,

    /// Quarantine annotation (`AUTO_REVIEW:...`); absent on healthy records.
    #[serde(rename = "ReportFlag", default, skip_serializing_if = "Option::is_none")]
    pub report_flag: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl QuestionRecord {
    /// Canonical display text: the free-text variant when present and
    /// non-empty, `Frage` otherwise.
    pub fn display_question(&self) -> &str {
        match &self.frage_freitext {
            Some(text) if !text.is_empty() => text,
            _ => &self.frage,
        }
    }

    /// Write `text` through to all three question-text aliases.
    pub fn set_question_text(&mut self, text: &str) {
        self.frage = text.to_string();
        self.frage_freitext = Some(text.to_string());
        self.frage_mc = Some(text.to_string());
    }

    /// Whether the record may be included in PDF exports (default true).
    pub fn is_pdf_eligible(&self) -> bool {
        self.pdf_eligible.unwrap_or(true)
    }
}

/// Structured extraction of one incoming report message.
///
/// Immutable once parsed. Every field defaults to empty when the body did
/// not carry the corresponding label; a report with an empty `question`
/// cannot be matched against the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub mode: String,
    /// Question text as the reporter saw it; the join key against the
    /// dataset.
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    /// Reporter-suggested distractors; empty entries and the `-`
    /// placeholder are already excluded.
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub reason: String,
    /// Reporter-supplied timestamp, kept opaque.
    #[serde(default)]
    pub time: String,
}

impl Report {
    /// A report without a question cannot be applied to the dataset.
    pub fn has_question(&self) -> bool {
        !self.question.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json() -> &'static str {
        r#"{
            "Frage": "Was ist Niederwild?",
            "FrageFreitext": "Was ist Niederwild?",
            "FrageMC": "Was ist Niederwild?",
            "Antwort": "Feldhase",
            "FalscheAntwort1": "Rotwild",
            "FalscheAntwort2": "Damwild",
            "FalscheAntwort3": "Muffelwild",
            "Pruefungsfach": "Wildbiologie",
            "Tags": ["wild"],
            "AlternativeAntworten": ["Fuchs"]
        }"#
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let record: QuestionRecord = serde_json::from_str(record_json()).unwrap();
        assert_eq!(record.extra.get("FalscheAntwort1").unwrap(), "Rotwild");
        assert_eq!(record.extra.get("Pruefungsfach").unwrap(), "Wildbiologie");

        let rewritten = serde_json::to_value(&record).unwrap();
        assert_eq!(rewritten["FalscheAntwort3"], "Muffelwild");
        assert_eq!(rewritten["Tags"][0], "wild");
    }

    #[test]
    fn display_question_prefers_freitext() {
        let mut record: QuestionRecord = serde_json::from_str(record_json()).unwrap();
        assert_eq!(record.display_question(), "Was ist Niederwild?");

        record.frage_freitext = Some(String::new());
        record.frage = "Fallback".to_string();
        assert_eq!(record.display_question(), "Fallback");

        record.frage_freitext = None;
        assert_eq!(record.display_question(), "Fallback");
    }

    #[test]
    fn set_question_text_updates_all_aliases() {
        let mut record: QuestionRecord = serde_json::from_str(record_json()).unwrap();
        record.set_question_text("Neu?");
        assert_eq!(record.frage, "Neu?");
        assert_eq!(record.frage_freitext.as_deref(), Some("Neu?"));
        assert_eq!(record.frage_mc.as_deref(), Some("Neu?"));
    }

    #[test]
    fn pdf_eligible_defaults_to_true() {
        let record: QuestionRecord = serde_json::from_str(record_json()).unwrap();
        assert!(record.is_pdf_eligible());
        assert!(record.pdf_eligible.is_none());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("PdfEligible").is_none());
    }

    #[test]
    fn report_defaults_are_empty() {
        let report = Report::default();
        assert!(!report.has_question());
        assert!(report.alternatives.is_empty());
    }
}
