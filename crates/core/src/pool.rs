//! Question-pool assembly: merge, repair, deduplicate.

use std::collections::HashSet;

use crate::model::{Origin, Question, RawQuestion};
use crate::repair::repair_prompt;

/// Canonical dedup key for a question prompt: lower-cased, whitespace runs
/// collapsed to single spaces, trimmed.
#[must_use]
pub fn canonical_key(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counters describing what a pool build kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub kept: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

/// The deduplicated set of all loadable questions for the current
/// include-external setting. Built once per load cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pool {
    questions: Vec<Question>,
    stats: PoolStats,
}

impl Pool {
    /// Builds a pool from raw source batches, in caller-supplied order.
    ///
    /// Each record is validated, its prompt repaired, and then deduplicated by
    /// [`canonical_key`]; the first occurrence wins. Malformed records and
    /// records whose repaired prompt still has an empty key are dropped
    /// silently (counted in [`PoolStats`], never an error).
    #[must_use]
    pub fn build(sources: impl IntoIterator<Item = (Origin, Vec<RawQuestion>)>) -> Self {
        let mut questions = Vec::new();
        let mut stats = PoolStats::default();
        let mut seen = HashSet::new();

        for (origin, records) in sources {
            for raw in records {
                let Ok(mut question) = raw.validate(origin) else {
                    stats.malformed += 1;
                    continue;
                };
                repair_prompt(&mut question);

                let key = canonical_key(&question.text);
                if key.is_empty() {
                    stats.malformed += 1;
                } else if seen.insert(key) {
                    questions.push(question);
                } else {
                    stats.duplicates += 1;
                }
            }
        }

        stats.kept = questions.len();
        Self { questions, stats }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(text: &str, correct: &str) -> RawQuestion {
        serde_json::from_value(json!({
            "question_text": text,
            "type": "single_choice",
            "possible_answers": [correct, "other"],
            "correct_answer": correct,
        }))
        .unwrap()
    }

    #[test]
    fn key_normalizes_case_and_whitespace() {
        assert_eq!(
            canonical_key("  Was ist\teine   FIRMA? "),
            "was ist eine firma?"
        );
    }

    #[test]
    fn first_occurrence_wins_across_sources() {
        let internal = vec![raw("Was ist eine Firma?", "internal answer")];
        let external = vec![raw("  was IST eine  Firma?", "external answer")];

        let pool = Pool::build(vec![
            (Origin::Internal, internal),
            (Origin::ExternalTeacher, external),
        ]);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.stats().duplicates, 1);
        assert_eq!(pool.questions()[0].origin, Origin::Internal);
    }

    #[test]
    fn malformed_records_are_dropped_not_fatal() {
        let records = vec![
            raw("Gültige Frage?", "Ja"),
            serde_json::from_value(json!({ "type": "sort" })).unwrap(),
            serde_json::from_value(json!({ "correct_answer": "no text" })).unwrap(),
        ];

        let pool = Pool::build(vec![(Origin::Internal, records)]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.stats().malformed, 2);
    }

    #[test]
    fn build_is_deterministic() {
        let records = || {
            vec![
                raw("Frage A?", "1"),
                raw("Frage B?", "2"),
                raw("frage a?", "3"),
            ]
        };

        let a = Pool::build(vec![(Origin::Internal, records())]);
        let b = Pool::build(vec![(Origin::Internal, records())]);
        assert_eq!(a, b);
        assert_eq!(
            a.questions().iter().map(|q| q.text.as_str()).collect::<Vec<_>>(),
            vec!["Frage A?", "Frage B?"]
        );
    }

    #[test]
    fn repaired_prompts_participate_in_dedup() {
        // Two placeholder records about the same topic collapse into the
        // same synthesized prompt, so only one survives.
        let records = vec![raw("TBD", "Prokura erteilen"), raw("todo", "Prokura wird erteilt")];
        let pool = Pool::build(vec![(Origin::Internal, records)]);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.stats().duplicates, 1);
    }

    #[test]
    fn empty_sources_build_an_empty_pool() {
        let pool = Pool::build(Vec::<(Origin, Vec<RawQuestion>)>::new());
        assert!(pool.is_empty());
        assert_eq!(pool.stats(), PoolStats::default());
    }
}
