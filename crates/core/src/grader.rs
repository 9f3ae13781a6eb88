//! Pure grading rules, one per question type.
//!
//! Grading never fails: a missing answer, a shape mismatch between answer and
//! question, or a malformed record all grade as incorrect. String comparison
//! is case-insensitive throughout.

use std::collections::{HashMap, HashSet};

use crate::model::{Answer, Question, QuestionKind};

/// Decides whether `answer` is correct for `question`.
///
/// `None` means the question was skipped and grades as incorrect.
#[must_use]
pub fn grade(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (&question.kind, answer) {
        (
            QuestionKind::SingleChoice { correct, .. } | QuestionKind::TrueFalse { correct, .. },
            Answer::Selection(selected),
        ) => match selected.as_slice() {
            [only] => eq_ignore_case(only, correct),
            _ => false,
        },

        (QuestionKind::MultipleChoice { correct, .. }, Answer::Selection(selected)) => {
            let selected: HashSet<String> = selected.iter().map(|s| fold(s)).collect();
            let correct: HashSet<String> = correct.iter().map(|s| fold(s)).collect();
            selected == correct
        }

        (
            QuestionKind::Calculation { correct } | QuestionKind::FillInTheBlank { correct },
            Answer::Text(text),
        ) => eq_ignore_case(text.trim(), correct.trim()),

        (QuestionKind::Sort { correct_order, .. }, Answer::Order(order)) => {
            order == correct_order
        }

        (QuestionKind::Matching { correct, .. }, Answer::Matches(pairs)) => {
            let expected: HashMap<String, String> = correct
                .iter()
                .map(|(l, r)| (fold(l), fold(r)))
                .collect();
            let submitted: HashMap<String, String> =
                pairs.iter().map(|(l, r)| (fold(l), fold(r))).collect();
            submitted.len() == expected.len()
                && submitted
                    .iter()
                    .all(|(l, r)| expected.get(l).is_some_and(|exp| exp == r))
        }

        // Answer shape does not fit the question type.
        _ => false,
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}

fn fold(s: &str) -> String {
    s.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, QuestionKind, UiHints};

    fn question(kind: QuestionKind) -> Question {
        Question {
            id: None,
            text: "Q".to_owned(),
            kind,
            explanation: None,
            origin: Origin::Internal,
            hints: UiHints::default(),
            duplicate_group: None,
        }
    }

    fn single_choice() -> Question {
        question(QuestionKind::SingleChoice {
            options: vec!["Der Name".into(), "Das Gebäude".into()],
            correct: "Der Name".into(),
        })
    }

    fn multiple_choice() -> Question {
        question(QuestionKind::MultipleChoice {
            options: vec!["A".into(), "B".into(), "C".into()],
            correct: vec!["A".into(), "B".into()],
        })
    }

    #[test]
    fn single_choice_matches_case_insensitively() {
        let q = single_choice();
        assert!(grade(&q, Some(&Answer::single("der name"))));
        assert!(!grade(&q, Some(&Answer::single("Das Gebäude"))));
    }

    #[test]
    fn single_choice_with_several_selections_is_wrong() {
        let q = single_choice();
        let a = Answer::Selection(vec!["Der Name".into(), "Das Gebäude".into()]);
        assert!(!grade(&q, Some(&a)));
    }

    #[test]
    fn multiple_choice_requires_exact_set() {
        let q = multiple_choice();
        assert!(grade(
            &q,
            Some(&Answer::Selection(vec!["B".into(), "A".into()]))
        ));
        assert!(!grade(&q, Some(&Answer::Selection(vec!["A".into()]))));
        assert!(!grade(
            &q,
            Some(&Answer::Selection(vec![
                "A".into(),
                "B".into(),
                "C".into()
            ]))
        ));
    }

    #[test]
    fn calculation_trims_and_ignores_case() {
        let q = question(QuestionKind::Calculation {
            correct: "  42 Euro ".into(),
        });
        assert!(grade(&q, Some(&Answer::Text(" 42 euro".into()))));
        assert!(!grade(&q, Some(&Answer::Text("43 Euro".into()))));
    }

    #[test]
    fn sort_requires_exact_order() {
        let q = question(QuestionKind::Sort {
            fields: vec!["Reife".into(), "Einführung".into(), "Wachstum".into()],
            correct_order: vec![2, 0, 1],
        });
        assert!(grade(&q, Some(&Answer::Order(vec![2, 0, 1]))));
        assert!(!grade(&q, Some(&Answer::Order(vec![0, 1, 2]))));
        assert!(!grade(&q, Some(&Answer::Order(vec![2, 0]))));
    }

    #[test]
    fn matching_requires_full_mapping() {
        let q = question(QuestionKind::Matching {
            left: vec!["OG".into(), "GmbH".into()],
            right: vec!["unbeschränkt".into(), "beschränkt".into()],
            correct: vec![
                ("OG".into(), "unbeschränkt".into()),
                ("GmbH".into(), "beschränkt".into()),
            ],
        });

        let right = Answer::Matches(vec![
            ("GmbH".into(), "beschränkt".into()),
            ("OG".into(), "unbeschränkt".into()),
        ]);
        assert!(grade(&q, Some(&right)));

        let partial = Answer::Matches(vec![("OG".into(), "unbeschränkt".into())]);
        assert!(!grade(&q, Some(&partial)));

        let swapped = Answer::Matches(vec![
            ("OG".into(), "beschränkt".into()),
            ("GmbH".into(), "unbeschränkt".into()),
        ]);
        assert!(!grade(&q, Some(&swapped)));
    }

    #[test]
    fn missing_answer_grades_incorrect_for_every_type() {
        assert!(!grade(&single_choice(), None));
        assert!(!grade(&multiple_choice(), None));
    }

    #[test]
    fn shape_mismatch_grades_incorrect() {
        let q = single_choice();
        assert!(!grade(&q, Some(&Answer::Order(vec![0]))));
        assert!(!grade(&q, Some(&Answer::Text("Der Name".into()))));
    }

    #[test]
    fn grading_is_idempotent() {
        let q = multiple_choice();
        let a = Answer::Selection(vec!["A".into(), "B".into()]);
        let first = grade(&q, Some(&a));
        let second = grade(&q, Some(&a));
        assert_eq!(first, second);
        assert!(first);
    }
}
