//! The learn/test state machine.
//!
//! The engine owns the current pool and all mutable session state and is only
//! ever driven from user-triggered events, so it needs no locking. Rendering
//! is somebody else's job: the engine hands out data and results.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use quiz_core::Pool;
use quiz_core::grade;
use quiz_core::model::{Answer, ExamResult, Question};

use crate::error::EngineError;
use crate::session::{Mode, Session};
use crate::view::correct_answer_display;

/// Immediate feedback for a checked answer in learn mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFeedback {
    pub correct: bool,
    /// Display form of the correct answer, shown when the check failed.
    pub correct_display: String,
    pub explanation: Option<String>,
}

/// Where the engine currently is. The results screen is the `Idle` variant
/// holding the last exam result.
#[derive(Debug, Clone)]
pub enum EngineState {
    Idle { last_result: Option<ExamResult> },
    InSession(Session),
}

pub struct QuizEngine {
    pool: Pool,
    state: EngineState,
    test_session_size: usize,
    min_pool_for_test: usize,
    /// Test-mode answer staged by `submit_answer`, committed on `advance`.
    pending: Option<Answer>,
    seed: Option<u64>,
}

impl QuizEngine {
    #[must_use]
    pub fn new(test_session_size: usize, min_pool_for_test: usize) -> Self {
        Self {
            pool: Pool::default(),
            state: EngineState::Idle { last_result: None },
            test_session_size,
            min_pool_for_test,
            pending: None,
            seed: None,
        }
    }

    /// Fixes the shuffle seed for deterministic sessions in tests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the pool after a reload and resets to the start screen.
    pub fn set_pool(&mut self, pool: Pool) {
        self.pool = pool;
        self.pending = None;
        self.state = EngineState::Idle { last_result: None };
    }

    #[must_use]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            EngineState::InSession(session) => Some(session),
            EngineState::Idle { .. } => None,
        }
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&ExamResult> {
        match &self.state {
            EngineState::Idle { last_result } => last_result.as_ref(),
            EngineState::InSession(_) => None,
        }
    }

    /// Starts learn mode over the full, shuffled pool.
    ///
    /// With an empty pool this is a no-op: there is nothing to step through,
    /// so the start screen stays up.
    pub fn start_learn(&mut self) {
        if self.pool.is_empty() {
            return;
        }
        let questions = self.shuffled_pool();
        self.pending = None;
        self.state = EngineState::InSession(Session::new(Mode::Learn, questions));
    }

    /// Starts test mode over a shuffled subset of the pool.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InsufficientQuestions` (state unchanged) when
    /// the pool is smaller than the configured minimum.
    pub fn start_test(&mut self) -> Result<(), EngineError> {
        if self.pool.len() < self.min_pool_for_test {
            return Err(EngineError::InsufficientQuestions {
                available: self.pool.len(),
                required: self.min_pool_for_test,
            });
        }

        let mut questions = self.shuffled_pool();
        questions.truncate(self.test_session_size);
        self.pending = None;
        self.state = EngineState::InSession(Session::new(Mode::Test, questions));
        Ok(())
    }

    /// Takes an answer for the current question.
    ///
    /// Learn mode grades immediately and returns feedback; test mode stages
    /// the answer silently until the next `advance`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotInSession` outside a session.
    pub fn submit_answer(
        &mut self,
        answer: Answer,
    ) -> Result<Option<CheckFeedback>, EngineError> {
        let EngineState::InSession(session) = &mut self.state else {
            return Err(EngineError::NotInSession);
        };
        let Some(question) = session.current() else {
            return Err(EngineError::NotInSession);
        };

        match session.mode() {
            Mode::Learn => Ok(Some(check(question, &answer))),
            Mode::Test => {
                self.pending = Some(answer);
                Ok(None)
            }
        }
    }

    /// Moves to the next question; in test mode the staged answer is captured
    /// first. Reaching the end of the session finishes it: learn mode falls
    /// back to the start screen, test mode grades everything and returns the
    /// exam result.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NotInSession` outside a session.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Option<ExamResult>, EngineError> {
        let EngineState::InSession(session) = &mut self.state else {
            return Err(EngineError::NotInSession);
        };

        if session.mode() == Mode::Test {
            if let Some(answer) = self.pending.take() {
                session.record_current_answer(answer);
            }
        }
        session.advance();

        if !session.is_finished() {
            return Ok(None);
        }

        match session.mode() {
            Mode::Learn => {
                self.state = EngineState::Idle { last_result: None };
                Ok(None)
            }
            Mode::Test => {
                let total = session.len() as u32;
                let result = ExamResult::new(now, session.score(), total);
                self.state = EngineState::Idle {
                    last_result: Some(result.clone()),
                };
                Ok(Some(result))
            }
        }
    }

    fn shuffled_pool(&self) -> Vec<Question> {
        let mut questions = self.pool.questions().to_vec();
        match self.seed {
            Some(seed) => questions.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => questions.shuffle(&mut rand::rng()),
        }
        questions
    }
}

fn check(question: &Question, answer: &Answer) -> CheckFeedback {
    CheckFeedback {
        correct: grade(question, Some(answer)),
        correct_display: correct_answer_display(&question.kind),
        explanation: question.explanation.clone(),
    }
}
