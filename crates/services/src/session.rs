//! One learn or test run over an ordered subset of the pool.

use std::collections::{HashMap, HashSet};

use quiz_core::grade;
use quiz_core::model::{Answer, Question};

/// The two ways of stepping through questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Learn,
    Test,
}

/// Key under which a captured answer is stored.
///
/// The natural question id is used when the session contains it exactly once;
/// otherwise the session slot index steps in, so missing or duplicated ids in
/// source data can never overwrite or drop a captured answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnswerKey {
    Natural(String),
    Slot(usize),
}

/// An ordered, shuffled subset of the pool plus the answers captured so far.
///
/// Sessions are created when a mode starts and discarded when it ends; they
/// are never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    questions: Vec<Question>,
    keys: Vec<AnswerKey>,
    cursor: usize,
    answers: HashMap<AnswerKey, Answer>,
}

impl Session {
    /// Builds a session over already-shuffled questions and assigns every
    /// slot its answer key.
    #[must_use]
    pub fn new(mode: Mode, questions: Vec<Question>) -> Self {
        let mut seen = HashSet::new();
        let keys = questions
            .iter()
            .enumerate()
            .map(|(slot, q)| match &q.id {
                Some(id) if seen.insert(id.clone()) => AnswerKey::Natural(id.clone()),
                _ => AnswerKey::Slot(slot),
            })
            .collect();

        Self {
            mode,
            questions,
            keys,
            cursor: 0,
            answers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The question under the cursor, or `None` once the session ran out.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    /// Stores an answer for the question under the cursor.
    ///
    /// Has no effect when the session is already finished.
    pub fn record_current_answer(&mut self, answer: Answer) {
        if let Some(key) = self.keys.get(self.cursor) {
            self.answers.insert(key.clone(), answer);
        }
    }

    /// The answer captured for the question under the cursor, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&Answer> {
        self.keys.get(self.cursor).and_then(|key| self.answers.get(key))
    }

    pub fn advance(&mut self) {
        if self.cursor < self.questions.len() {
            self.cursor += 1;
        }
    }

    /// Grades every session question against the captured answers.
    /// Unanswered questions count as incorrect.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.questions
            .iter()
            .zip(&self.keys)
            .filter(|(question, key)| grade(question, self.answers.get(*key)))
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Origin, QuestionKind, UiHints};

    fn question(id: Option<&str>, text: &str, correct: &str) -> Question {
        Question {
            id: id.map(str::to_owned),
            text: text.to_owned(),
            kind: QuestionKind::SingleChoice {
                options: vec![correct.to_owned(), "falsch".to_owned()],
                correct: correct.to_owned(),
            },
            explanation: None,
            origin: Origin::Internal,
            hints: UiHints::default(),
            duplicate_group: None,
        }
    }

    #[test]
    fn natural_ids_become_answer_keys() {
        let session = Session::new(
            Mode::Test,
            vec![question(Some("q1"), "A?", "a"), question(Some("q2"), "B?", "b")],
        );
        assert_eq!(session.keys[0], AnswerKey::Natural("q1".into()));
        assert_eq!(session.keys[1], AnswerKey::Natural("q2".into()));
    }

    #[test]
    fn duplicate_and_missing_ids_fall_back_to_slots() {
        let session = Session::new(
            Mode::Test,
            vec![
                question(Some("dup"), "A?", "a"),
                question(Some("dup"), "B?", "b"),
                question(None, "C?", "c"),
            ],
        );
        assert_eq!(session.keys[0], AnswerKey::Natural("dup".into()));
        assert_eq!(session.keys[1], AnswerKey::Slot(1));
        assert_eq!(session.keys[2], AnswerKey::Slot(2));
    }

    #[test]
    fn answers_with_clashing_ids_do_not_overwrite_each_other() {
        let mut session = Session::new(
            Mode::Test,
            vec![
                question(Some("dup"), "A?", "a"),
                question(Some("dup"), "B?", "b"),
            ],
        );

        session.record_current_answer(Answer::single("a"));
        session.advance();
        session.record_current_answer(Answer::single("b"));
        session.advance();

        assert!(session.is_finished());
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn unanswered_questions_score_zero() {
        let mut session = Session::new(
            Mode::Test,
            vec![question(Some("q1"), "A?", "a"), question(Some("q2"), "B?", "b")],
        );

        session.record_current_answer(Answer::single("a"));
        session.advance();
        session.advance(); // q2 skipped

        assert_eq!(session.score(), 1);
    }

    #[test]
    fn advance_saturates_at_session_end() {
        let mut session = Session::new(Mode::Learn, vec![question(None, "A?", "a")]);
        session.advance();
        session.advance();
        assert_eq!(session.cursor(), 1);
        assert!(session.is_finished());
        assert!(session.current().is_none());
    }
}
