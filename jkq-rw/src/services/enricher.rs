//! Alternative-answer enrichment
//!
//! Derives plausible distractors for a record from curated pools keyed by
//! topic keywords. Enrichment only ever refines: with no matching topic the
//! record is left untouched.

use jkq_common::QuestionRecord;

/// Upper bound on stored alternatives per record.
pub const MAX_ALTERNATIVES: usize = 8;

const NIEDERWILD_POOL: &[&str] = &[
    "Fuchs",
    "Kaninchen",
    "Feldhase",
    "Rehwild",
    "Rebhuhn",
    "Fasan",
    "Stockente",
    "Ringeltaube",
];

const HOCHWILD_POOL: &[&str] = &["Rotwild", "Damwild", "Rehwild", "Schwarzwild", "Muffelwild"];

const WIEDERKAEUER_POOL: &[&str] = &["Rehwild", "Rotwild", "Damwild", "Muffelwild"];

/// Topic triggers in fixed priority order; the first keyword found in the
/// lower-cased question text or answer wins.
fn candidate_pool(question: &str, answer: &str) -> Option<&'static [&'static str]> {
    let hit = |keyword: &str| question.contains(keyword) || answer.contains(keyword);

    if hit("niederwild") {
        Some(NIEDERWILD_POOL)
    } else if hit("hochwild") {
        Some(HOCHWILD_POOL)
    } else if hit("wiederkäuer") || hit("wiederkaeuer") {
        Some(WIEDERKAEUER_POOL)
    } else {
        None
    }
}

/// Merge pool candidates into a record's alternatives.
///
/// Existing alternatives keep their order and come first; pool candidates
/// follow. Duplicates and the record's own answer (case-insensitive) are
/// dropped, and the result is capped at [`MAX_ALTERNATIVES`].
pub fn enrich_alternatives(record: &mut QuestionRecord) {
    let question = record.display_question().to_lowercase();
    let answer = record.antwort.trim().to_lowercase();

    let Some(pool) = candidate_pool(&question, &answer) else {
        return;
    };

    let existing = std::mem::take(&mut record.alternative_antworten);
    let mut merged: Vec<String> = Vec::new();
    for candidate in existing
        .into_iter()
        .chain(pool.iter().map(|s| s.to_string()))
    {
        if candidate.is_empty() || candidate.to_lowercase() == answer {
            continue;
        }
        if !merged.contains(&candidate) {
            merged.push(candidate);
        }
    }
    merged.truncate(MAX_ALTERNATIVES);
    record.alternative_antworten = merged;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, answer: &str, alternatives: &[&str]) -> QuestionRecord {
        let mut record: QuestionRecord = serde_json::from_str("{}").unwrap();
        record.set_question_text(question);
        record.antwort = answer.to_string();
        record.alternative_antworten = alternatives.iter().map(|s| s.to_string()).collect();
        record
    }

    #[test]
    fn niederwild_pool_fills_alternatives() {
        let mut r = record("Was zählt zum Niederwild?", "Feldhase", &[]);
        enrich_alternatives(&mut r);
        assert!(r.alternative_antworten.contains(&"Fuchs".to_string()));
        assert!(r.alternative_antworten.contains(&"Fasan".to_string()));
        // The record's own answer never shows up
        assert!(!r.alternative_antworten.contains(&"Feldhase".to_string()));
        assert!(r.alternative_antworten.len() <= MAX_ALTERNATIVES);
    }

    #[test]
    fn existing_alternatives_come_first_and_are_kept() {
        let mut r = record("Was zählt zum Hochwild?", "Rotwild", &["Steinbock"]);
        enrich_alternatives(&mut r);
        assert_eq!(r.alternative_antworten[0], "Steinbock");
        assert!(r.alternative_antworten.contains(&"Damwild".to_string()));
        assert!(!r.alternative_antworten.contains(&"Rotwild".to_string()));
    }

    #[test]
    fn duplicates_are_dropped_on_first_occurrence() {
        let mut r = record("Was zählt zum Hochwild?", "Rotwild", &["Damwild", "Damwild"]);
        enrich_alternatives(&mut r);
        let damwild = r
            .alternative_antworten
            .iter()
            .filter(|a| *a == "Damwild")
            .count();
        assert_eq!(damwild, 1);
    }

    #[test]
    fn niederwild_wins_over_other_triggers() {
        let mut r = record(
            "Gehört der Feldhase zum Niederwild oder zum Hochwild?",
            "Niederwild",
            &[],
        );
        enrich_alternatives(&mut r);
        // Niederwild pool, not Hochwild: Rebhuhn only exists in the former.
        assert!(r.alternative_antworten.contains(&"Rebhuhn".to_string()));
        assert!(!r.alternative_antworten.contains(&"Schwarzwild".to_string()));
    }

    #[test]
    fn ruminant_answer_triggers_ruminant_pool() {
        let mut r = record("Welche Ernährungsweise hat Rehwild?", "Wiederkäuer", &[]);
        enrich_alternatives(&mut r);
        assert_eq!(
            r.alternative_antworten,
            vec!["Rehwild", "Rotwild", "Damwild", "Muffelwild"]
        );
    }

    #[test]
    fn ascii_spelling_triggers_ruminant_pool() {
        let mut r = record("Welche Tiere sind Wiederkaeuer?", "Rehwild", &[]);
        enrich_alternatives(&mut r);
        assert_eq!(
            r.alternative_antworten,
            vec!["Rotwild", "Damwild", "Muffelwild"]
        );
    }

    #[test]
    fn no_trigger_leaves_alternatives_untouched() {
        let mut r = record("Wie lang ist die Brunftzeit?", "Vier Wochen", &["Vier Wochen", "x"]);
        enrich_alternatives(&mut r);
        // Not even the answer filter runs; enrichment is a no-op refinement.
        assert_eq!(r.alternative_antworten, vec!["Vier Wochen", "x"]);
    }

    #[test]
    fn merged_list_is_capped_at_eight() {
        let extra: Vec<&str> = vec!["A", "B", "C", "D", "E", "F", "G"];
        let mut r = record("Was zählt zum Niederwild?", "Feldhase", &extra);
        enrich_alternatives(&mut r);
        assert_eq!(r.alternative_antworten.len(), MAX_ALTERNATIVES);
        // Most relevant first: the reporter-provided entries survive the cap.
        assert_eq!(&r.alternative_antworten[..7], &extra[..]);
        assert_eq!(r.alternative_antworten[7], "Fuchs");
    }

    #[test]
    fn answer_match_is_case_insensitive() {
        let mut r = record("Was zählt zum Hochwild?", "rotwild", &["ROTWILD"]);
        enrich_alternatives(&mut r);
        assert!(!r
            .alternative_antworten
            .iter()
            .any(|a| a.eq_ignore_ascii_case("rotwild")));
    }
}
