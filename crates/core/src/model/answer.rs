/// A captured user answer, shaped by the input control that produced it.
///
/// The grader tolerates any shape against any question type; a mismatch simply
/// grades as incorrect.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Selected options. Single-choice controls produce one element,
    /// multiple-choice controls any number.
    Selection(Vec<String>),
    /// Free-text input (calculation, fill-in-the-blank).
    Text(String),
    /// Original indices of the sort fields in submitted order.
    Order(Vec<usize>),
    /// Chosen (left, right) pairs of a matching question.
    Matches(Vec<(String, String)>),
}

impl Answer {
    /// Convenience constructor for a single selected option.
    #[must_use]
    pub fn single(option: impl Into<String>) -> Self {
        Answer::Selection(vec![option.into()])
    }

    /// Short label for logging and debug views.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Answer::Selection(_) => "selection",
            Answer::Text(_) => "text",
            Answer::Order(_) => "order",
            Answer::Matches(_) => "matches",
        }
    }
}
