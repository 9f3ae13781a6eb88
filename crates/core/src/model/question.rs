use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

//
// ─── RAW QUESTION RECORDS ──────────────────────────────────────────────────────
//

/// A question id as it appears in source JSON: either a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// The permissive on-disk shape of a question record.
///
/// Source files are hand-edited and generated by different pipelines, so every
/// field is optional here. `validate` turns a raw record into a domain
/// [`Question`] or rejects it as malformed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestion {
    pub id: Option<RawId>,
    pub question_text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub possible_answers: Option<Vec<String>>,
    pub correct_answer: Option<Value>,
    pub order_fields: Option<Vec<String>>,
    pub correct_order: Option<Vec<usize>>,
    pub options_left: Option<Vec<String>>,
    pub options_right: Option<Vec<String>>,
    pub correct_matches: Option<Vec<(String, String)>>,
    pub explanation: Option<String>,
    pub origin: Option<String>,
    pub background_color: Option<String>,
    pub badge_color: Option<String>,
    pub duplicate_group: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("record has no question_text string")]
    MissingText,

    #[error("unknown question type: {0}")]
    UnknownKind(String),

    #[error("record is missing required field {0}")]
    MissingField(&'static str),

    #[error("field {0} has an unusable shape")]
    BadField(&'static str),
}

//
// ─── DOMAIN QUESTION ───────────────────────────────────────────────────────────
//

/// Where a question came from. External questions are only included when the
/// include-external flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Internal,
    ExternalTeacher,
}

/// Presentation hints carried through from the source record. The engine never
/// interprets these; they are handed to the presentation layer as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiHints {
    pub background_color: Option<String>,
    pub badge_color: Option<String>,
}

/// Type-specific payload of a question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<String>,
        correct: String,
    },
    TrueFalse {
        options: Vec<String>,
        correct: String,
    },
    MultipleChoice {
        options: Vec<String>,
        correct: Vec<String>,
    },
    Calculation {
        correct: String,
    },
    FillInTheBlank {
        correct: String,
    },
    Sort {
        fields: Vec<String>,
        correct_order: Vec<usize>,
    },
    Matching {
        left: Vec<String>,
        right: Vec<String>,
        correct: Vec<(String, String)>,
    },
}

impl QuestionKind {
    /// Stable name matching the `type` discriminant in source files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice { .. } => "single_choice",
            QuestionKind::TrueFalse { .. } => "true_false",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::Calculation { .. } => "calculation",
            QuestionKind::FillInTheBlank { .. } => "fill_in_the_blank",
            QuestionKind::Sort { .. } => "sort",
            QuestionKind::Matching { .. } => "matching",
        }
    }
}

/// A validated question ready for pooling and grading.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: Option<String>,
    pub text: String,
    pub kind: QuestionKind,
    pub explanation: Option<String>,
    pub origin: Origin,
    pub hints: UiHints,
    pub duplicate_group: Option<String>,
}

impl RawQuestion {
    /// Validate a raw record into a domain question.
    ///
    /// A missing `type` defaults to `single_choice`, matching the behavior of
    /// the question files already in circulation. Blank question text is
    /// allowed here; prompt repair and pool dedup deal with it later.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the record lacks a `question_text` string
    /// or the fields its type requires.
    pub fn validate(self, origin: Origin) -> Result<Question, QuestionError> {
        let text = self.question_text.ok_or(QuestionError::MissingText)?;
        let kind_name = self.kind.as_deref().unwrap_or("single_choice");

        let kind = match kind_name {
            "single_choice" => QuestionKind::SingleChoice {
                options: self.possible_answers.unwrap_or_default(),
                correct: scalar_answer(self.correct_answer, "correct_answer")?,
            },
            "true_false" => QuestionKind::TrueFalse {
                options: self
                    .possible_answers
                    .unwrap_or_else(|| vec!["true".to_owned(), "false".to_owned()]),
                correct: scalar_answer(self.correct_answer, "correct_answer")?,
            },
            "multiple_choice" => QuestionKind::MultipleChoice {
                options: self
                    .possible_answers
                    .ok_or(QuestionError::MissingField("possible_answers"))?,
                correct: list_answer(self.correct_answer)?,
            },
            "calculation" => QuestionKind::Calculation {
                correct: scalar_answer(self.correct_answer, "correct_answer")?,
            },
            "fill_in_the_blank" => QuestionKind::FillInTheBlank {
                correct: scalar_answer(self.correct_answer, "correct_answer")?,
            },
            "sort" => QuestionKind::Sort {
                fields: self
                    .order_fields
                    .ok_or(QuestionError::MissingField("order_fields"))?,
                correct_order: self
                    .correct_order
                    .ok_or(QuestionError::MissingField("correct_order"))?,
            },
            "matching" => QuestionKind::Matching {
                left: self
                    .options_left
                    .ok_or(QuestionError::MissingField("options_left"))?,
                right: self
                    .options_right
                    .ok_or(QuestionError::MissingField("options_right"))?,
                correct: self
                    .correct_matches
                    .ok_or(QuestionError::MissingField("correct_matches"))?,
            },
            other => return Err(QuestionError::UnknownKind(other.to_owned())),
        };

        Ok(Question {
            id: self.id.map(RawId::into_string),
            text: text.trim().to_owned(),
            kind,
            explanation: self.explanation,
            origin: match self.origin.as_deref() {
                Some("external_teacher") => Origin::ExternalTeacher,
                _ => origin,
            },
            hints: UiHints {
                background_color: self.background_color,
                badge_color: self.badge_color,
            },
            duplicate_group: self.duplicate_group,
        })
    }
}

/// Extracts a single-string answer, coercing numbers and booleans the way the
/// loose JSON sources use them (`correct_answer: true`, `correct_answer: 42`).
fn scalar_answer(value: Option<Value>, field: &'static str) -> Result<String, QuestionError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(QuestionError::BadField(field)),
        None => Err(QuestionError::MissingField(field)),
    }
}

fn list_answer(value: Option<Value>) -> Result<Vec<String>, QuestionError> {
    let Some(Value::Array(items)) = value else {
        return Err(QuestionError::BadField("correct_answer"));
    };
    items
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            _ => Err(QuestionError::BadField("correct_answer")),
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
