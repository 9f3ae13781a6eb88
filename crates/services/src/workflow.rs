//! Event-driven quiz workflow.
//!
//! One service owns the loader, the engine, and the history log, and turns
//! presentation-layer events into screen views. All four historical app
//! variants are this service with different [`QuizConfig`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

use quiz_core::Clock;
use storage::repository::HistoryRepository;

use crate::config::QuizConfig;
use crate::engine::{CheckFeedback, QuizEngine};
use crate::history_service::HistoryService;
use crate::loader::SourceLoader;
use crate::session::Mode;
use crate::view::{self, ScreenView, UiEvent};

/// Message shown when every requested source failed to load.
pub const LOAD_FAILURE_MESSAGE: &str = "Could not load questions. Check the question files.";

/// What an event produced: the next screen, plus learn-mode check feedback
/// when the event was an answer check.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub view: ScreenView,
    pub feedback: Option<CheckFeedback>,
}

pub struct QuizService {
    config: QuizConfig,
    loader: SourceLoader,
    engine: QuizEngine,
    history: HistoryService,
    clock: Clock,
    include_external: bool,
    /// Monotonic load-cycle counter; results of superseded loads are dropped.
    generation: AtomicU64,
    /// One-shot message surfaced on the next rendered screen.
    alert: Option<String>,
}

impl QuizService {
    #[must_use]
    pub fn new(config: QuizConfig, history_repo: Arc<dyn HistoryRepository>) -> Self {
        let engine = QuizEngine::new(config.test_session_size, config.min_pool_for_test);
        let history = HistoryService::new(history_repo, config.history_limit);
        let include_external = config.include_external_default;
        Self {
            config,
            loader: SourceLoader::new(),
            engine,
            history,
            clock: Clock::default(),
            include_external,
            generation: AtomicU64::new(0),
            alert: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Fixes the session shuffle for deterministic tests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.engine = self.engine.with_seed(seed);
        self
    }

    /// Performs the initial load cycle and returns the start screen.
    pub async fn init(&mut self) -> ScreenView {
        self.reload().await;
        self.view().await
    }

    #[must_use]
    pub fn include_external(&self) -> bool {
        self.include_external
    }

    /// Applies one presentation-layer event and returns the resulting screen.
    ///
    /// Events that do not fit the current state (answers outside a session,
    /// a test start on a thin pool) degrade to a logged warning or an alert
    /// on the returned screen; none of them fail the session.
    pub async fn handle_event(&mut self, event: UiEvent) -> EventOutcome {
        let mut feedback = None;

        match event {
            UiEvent::SelectMode(Mode::Learn) => self.engine.start_learn(),
            UiEvent::SelectMode(Mode::Test) => {
                if let Err(e) = self.engine.start_test() {
                    self.alert = Some(e.to_string());
                }
            }
            UiEvent::ToggleIncludeExternal(include) => {
                self.include_external = include;
                self.reload().await;
            }
            UiEvent::SubmitAnswer(answer) => match self.engine.submit_answer(answer) {
                Ok(check) => feedback = check,
                Err(e) => warn!("ignoring answer event: {e}"),
            },
            UiEvent::Advance => match self.engine.advance(self.clock.now()) {
                Ok(Some(result)) => {
                    self.history.record(result).await;
                }
                Ok(None) => {}
                Err(e) => warn!("ignoring advance event: {e}"),
            },
            UiEvent::RequestRefresh => self.reload().await,
        }

        EventOutcome {
            view: self.view().await,
            feedback,
        }
    }

    /// The current screen. Pending alerts are consumed by this call.
    pub async fn view(&mut self) -> ScreenView {
        let history = self.history.recent().await;
        view::screen(&self.engine, history, self.alert.take())
    }

    /// Runs one load cycle for the current include-external setting.
    async fn reload(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let external = self
            .include_external
            .then_some(self.config.external_source.as_ref())
            .flatten();

        let load = self
            .loader
            .load_pool(&self.config.internal_source, external)
            .await;

        // A toggle or refresh that arrived while this load was in flight has
        // already bumped the generation; its own load cycle owns the pool.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding superseded load (generation {generation})");
            return;
        }

        if load.all_failed() {
            self.alert = Some(LOAD_FAILURE_MESSAGE.to_owned());
        }
        self.engine.set_pool(load.pool);
    }
}
