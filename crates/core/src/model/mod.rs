mod answer;
mod question;
mod result;

pub use answer::Answer;
pub use question::{Origin, Question, QuestionError, QuestionKind, RawId, RawQuestion, UiHints};
pub use result::{ExamResult, GradeBand};
