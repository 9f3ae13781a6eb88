#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod history_service;
pub mod loader;
pub mod session;
pub mod view;
pub mod workflow;

pub use quiz_core::Clock;

pub use config::QuizConfig;
pub use engine::{CheckFeedback, EngineState, QuizEngine};
pub use error::{EngineError, LoaderError};
pub use history_service::HistoryService;
pub use loader::{PoolLoad, QuestionSource, SourceLoader};
pub use session::{AnswerKey, Mode, Session};
pub use view::{Controls, QuestionView, ScreenView, UiEvent};
pub use workflow::{EventOutcome, QuizService};
