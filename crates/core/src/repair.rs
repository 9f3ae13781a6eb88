//! Prompt repair for messy source records.
//!
//! The question files come out of several extraction pipelines and manual
//! edits, so some records carry placeholder text ("siehe Lerntext", "TBD"),
//! bare label fragments ("Vorteile"), or nothing at all. Instead of dropping
//! them, a usable prompt is synthesized from what the correct answer reveals
//! about the topic.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Question, QuestionKind};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(siehe\s*lerntext|siehe\s*lehrtext|korrekte\s*bezeichnung|platzhalter|tbd|todo|\?{2,})")
        .expect("placeholder pattern is valid")
});

static BARE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\**\s*(vor|nach)-?\s?teile\s*:?\s*$").expect("label pattern is valid")
});

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("blank-run pattern is valid"));

/// Domain keywords looked up in the correct answer, mapped to a topic label.
/// First match wins, so more specific terms come first.
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("prokura", "Prokura"),
    ("handlungsvollmacht", "Handlungsvollmacht"),
    ("komplementär", "Haftung in der KG"),
    ("kommanditist", "Haftung in der KG"),
    ("gesellschaftsvermögen", "Haftung der GmbH"),
    ("solidarisch", "Haftung in der OG"),
    ("haftung", "Haftung"),
    ("vorstand", "Organe der AG"),
    ("aufsichtsrat", "Organe der AG"),
    ("hauptversammlung", "Organe der AG"),
    ("kennzeichnungsfunktion", "Funktionen der Firma"),
    ("unterscheidungsfunktion", "Funktionen der Firma"),
    ("degeneration", "Produktlebenszyklus"),
    ("sättigung", "Produktlebenszyklus"),
    ("gewinnerzielungsabsicht", "Unternehmermerkmale"),
    ("firmenbuch", "Firmenbuch"),
    ("gmbh", "GmbH"),
];

/// Repairs a question's prompt in place.
///
/// Placeholder, bare-label, or all-blank prompts are replaced with a
/// synthesized "list the key points" prompt for the inferred topic. In every
/// other prompt, runs of two or more underscores collapse into an ellipsis.
pub fn repair_prompt(question: &mut Question) {
    let text = question.text.trim();

    if needs_synthesis(text) {
        question.text = synthesize_prompt(&question.kind);
    } else {
        question.text = BLANK_RUN.replace_all(text, "…").into_owned();
    }
}

fn needs_synthesis(text: &str) -> bool {
    text.is_empty() || PLACEHOLDER.is_match(text) || BARE_LABEL.is_match(text)
}

fn synthesize_prompt(kind: &QuestionKind) -> String {
    match infer_topic(kind) {
        Some(topic) => format!("Nenne die wichtigsten Punkte zu {topic}."),
        None => "Nenne die wichtigsten Punkte zu diesem Thema.".to_owned(),
    }
}

fn infer_topic(kind: &QuestionKind) -> Option<&'static str> {
    let haystack = answer_terms(kind).to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, topic)| *topic)
}

/// All answer-side strings of a question, joined for keyword search.
fn answer_terms(kind: &QuestionKind) -> String {
    match kind {
        QuestionKind::SingleChoice { correct, .. }
        | QuestionKind::TrueFalse { correct, .. }
        | QuestionKind::Calculation { correct }
        | QuestionKind::FillInTheBlank { correct } => correct.clone(),
        QuestionKind::MultipleChoice { correct, .. } => correct.join(" "),
        QuestionKind::Sort { fields, .. } => fields.join(" "),
        QuestionKind::Matching { correct, .. } => correct
            .iter()
            .flat_map(|(l, r)| [l.as_str(), r.as_str()])
            .collect::<Vec<_>>()
            .join(" "),
    }
}
