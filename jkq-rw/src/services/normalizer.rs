//! Question text normalization
//!
//! A small rule-based repair engine for a closed vocabulary of known
//! malformed questions. The rules are hand-curated against the dataset;
//! correctness means reproducing the fixed canonical phrasings, not general
//! linguistic soundness.

use once_cell::sync::Lazy;
use regex::Regex;

/// Boilerplate prefixes stripped from the start until a fixed point.
static BROKEN_PREFIXES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(Welche Aussage ist richtig:\s*|Welche Antwort ist richtig\?\s*|Was trifft zu\?\s*|Bitte wählen Sie[^:]*:\s*)",
    )
    .expect("invalid prefix pattern")
});

/// One whole-string rewrite: a known malformed template restated as its
/// canonical phrasing.
struct RewriteRule {
    pattern: Regex,
    replacement: &'static str,
}

/// Applied once each, in order, never chained.
static REWRITE_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    let rule = |pattern: &str, replacement: &'static str| RewriteRule {
        pattern: Regex::new(pattern).expect("invalid rewrite pattern"),
        replacement,
    };
    vec![
        rule(
            r"(?i)^Welcher Gruppe wird (.+?) zugeordnet\?$",
            "Zu welcher Gruppe gehört $1?",
        ),
        rule(
            r"(?i)^Zu welcher Gruppe gehört (.+?) zugeordnet\?$",
            "Zu welcher Gruppe gehört $1?",
        ),
        rule(
            r"(?i)^Nennen Sie eine Wildart, die in Deutschland klassisch zum Niederwild\.?$",
            "Nennen Sie Wildarten, die in Deutschland zum Niederwild zählen.",
        ),
        rule(
            r"(?i)^Nennen Sie eine Wildart, die zum Hochwild\.?$",
            "Was gehört alles zum Hochwild?",
        ),
    ]
});

/// The catch-all template that carries no information on its own; the
/// stored answer decides which canonical phrasing fits.
static GENERIC_TEMPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Was trifft auf (.+?) zu\?$").expect("invalid template pattern")
});

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("invalid whitespace pattern"));

/// Answers that mark a question as a group-classification question.
const GROUP_ANSWERS: [&str; 6] = [
    "Gründelente",
    "Tauchente",
    "Hühnervogel",
    "Greifvogel",
    "Rabenvogel",
    "Gänsevogel",
];

/// Answers that mark a question as a feeding-type question.
const DIET_ANSWERS: [&str; 4] = [
    "Wiederkäuer",
    "Allesfresser",
    "Fleischfresser",
    "Pflanzenfresser",
];

/// Normalize a question's display text.
///
/// Pure and deterministic; applying it to its own output changes nothing.
pub fn normalize_question(text: &str, answer: &str) -> String {
    let mut s = text.trim().to_string();

    // Strip broken prefixes until the string stops changing. Each strip
    // shortens the string, so this terminates.
    loop {
        let stripped = BROKEN_PREFIXES.replace(&s, "").trim().to_string();
        if stripped == s {
            break;
        }
        s = stripped;
    }

    for rule in REWRITE_RULES.iter() {
        s = rule.pattern.replace(&s, rule.replacement).into_owned();
    }

    if GENERIC_TEMPLATE.is_match(&s) {
        if GROUP_ANSWERS.contains(&answer) {
            s = GENERIC_TEMPLATE
                .replace(&s, "Zu welcher Gruppe gehört $1?")
                .into_owned();
        } else if DIET_ANSWERS.contains(&answer) {
            s = GENERIC_TEMPLATE
                .replace(&s, "Welche Ernährungsweise hat $1?")
                .into_owned();
        }
    }

    s = s.replace("?.", "?");
    s = WHITESPACE_RUNS.replace_all(&s, " ").trim().to_string();
    if !s.is_empty() && !s.ends_with('?') && !s.ends_with('.') {
        s.push('?');
    }
    s
}
