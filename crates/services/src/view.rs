//! The presentation port.
//!
//! The engine never touches rendering handles. It emits [`ScreenView`] data
//! for the presentation layer to draw, and receives [`UiEvent`]s back. Any
//! front end (terminal, web shell, tests) plugs in at this seam.

use quiz_core::model::{Answer, ExamResult, Question, QuestionKind, UiHints};

use crate::engine::{EngineState, QuizEngine};
use crate::session::{Mode, Session};

/// User interactions the presentation layer can send to the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SelectMode(Mode),
    ToggleIncludeExternal(bool),
    SubmitAnswer(Answer),
    Advance,
    RequestRefresh,
}

/// The input control a question needs, derived from its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Controls {
    /// Pick one (or several, when `multiple`) of the listed options.
    Options { options: Vec<String>, multiple: bool },
    /// Free-text entry.
    TextInput,
    /// Reorder the listed fields.
    Sortable { fields: Vec<String> },
    /// Assign each left option one of the right options.
    Matching { left: Vec<String>, right: Vec<String> },
}

impl Controls {
    #[must_use]
    pub fn for_question(question: &Question) -> Self {
        match &question.kind {
            QuestionKind::SingleChoice { options, .. }
            | QuestionKind::TrueFalse { options, .. } => Controls::Options {
                options: options.clone(),
                multiple: false,
            },
            QuestionKind::MultipleChoice { options, .. } => Controls::Options {
                options: options.clone(),
                multiple: true,
            },
            QuestionKind::Calculation { .. } | QuestionKind::FillInTheBlank { .. } => {
                Controls::TextInput
            }
            QuestionKind::Sort { fields, .. } => Controls::Sortable {
                fields: fields.clone(),
            },
            QuestionKind::Matching { left, right, .. } => Controls::Matching {
                left: left.clone(),
                right: right.clone(),
            },
        }
    }
}

/// Everything needed to render one question card.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub mode: Mode,
    /// Zero-based position in the session.
    pub index: usize,
    pub total: usize,
    pub text: String,
    pub controls: Controls,
    /// Progress is shown in test mode only.
    pub show_progress: bool,
    pub hints: UiHints,
}

/// The screen the presentation layer should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    /// Start screen with pool statistics and past attempts.
    Start {
        pool_size: usize,
        history: Vec<ExamResult>,
        alert: Option<String>,
    },
    Question(QuestionView),
    /// Results screen after a finished test.
    Result {
        result: ExamResult,
        message: &'static str,
    },
}

/// Builds the screen for the engine's current state.
#[must_use]
pub fn screen(engine: &QuizEngine, history: Vec<ExamResult>, alert: Option<String>) -> ScreenView {
    match engine.state() {
        EngineState::InSession(session) => match question_view(session) {
            Some(view) => ScreenView::Question(view),
            // A session whose cursor ran out is a transient state; fall back
            // to the start screen.
            None => start_screen(engine, history, alert),
        },
        EngineState::Idle {
            last_result: Some(result),
        } => ScreenView::Result {
            result: result.clone(),
            message: result.grade.message(),
        },
        EngineState::Idle { last_result: None } => start_screen(engine, history, alert),
    }
}

fn start_screen(
    engine: &QuizEngine,
    history: Vec<ExamResult>,
    alert: Option<String>,
) -> ScreenView {
    ScreenView::Start {
        pool_size: engine.pool().len(),
        history,
        alert,
    }
}

fn question_view(session: &Session) -> Option<QuestionView> {
    let question = session.current()?;
    Some(QuestionView {
        mode: session.mode(),
        index: session.cursor(),
        total: session.len(),
        text: question.text.clone(),
        controls: Controls::for_question(question),
        show_progress: session.mode() == Mode::Test,
        hints: question.hints.clone(),
    })
}

/// Human-readable form of a question's correct answer, for learn-mode
/// feedback after a wrong check.
#[must_use]
pub fn correct_answer_display(kind: &QuestionKind) -> String {
    match kind {
        QuestionKind::SingleChoice { correct, .. }
        | QuestionKind::TrueFalse { correct, .. }
        | QuestionKind::Calculation { correct }
        | QuestionKind::FillInTheBlank { correct } => correct.clone(),
        QuestionKind::MultipleChoice { correct, .. } => correct.join(", "),
        QuestionKind::Sort {
            fields,
            correct_order,
        } => correct_order
            .iter()
            .filter_map(|&i| fields.get(i).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" → "),
        QuestionKind::Matching { correct, .. } => correct
            .iter()
            .map(|(l, r)| format!("{l} → {r}"))
            .collect::<Vec<_>>()
            .join("; "),
    }
}
