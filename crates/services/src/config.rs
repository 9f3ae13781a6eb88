use crate::loader::QuestionSource;

/// Configuration collapsing the per-deployment app variants into one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    /// Primary question document; always loaded.
    pub internal_source: QuestionSource,
    /// Additional teacher-provided document, loaded only while the
    /// include-external flag is on.
    pub external_source: Option<QuestionSource>,
    /// Initial state of the include-external flag.
    pub include_external_default: bool,
    /// How many questions a test session holds.
    pub test_session_size: usize,
    /// Minimum pool size required to start a test.
    pub min_pool_for_test: usize,
    /// Upper bound of the persisted history log.
    pub history_limit: usize,
}

impl QuizConfig {
    /// Defaults matching the deployed app: 10-question tests, 10-entry
    /// history, external questions off.
    #[must_use]
    pub fn new(internal_source: QuestionSource) -> Self {
        Self {
            internal_source,
            external_source: None,
            include_external_default: false,
            test_session_size: 10,
            min_pool_for_test: 10,
            history_limit: 10,
        }
    }

    #[must_use]
    pub fn with_external_source(mut self, source: QuestionSource) -> Self {
        self.external_source = Some(source);
        self
    }

    #[must_use]
    pub fn with_include_external_default(mut self, include: bool) -> Self {
        self.include_external_default = include;
        self
    }

    #[must_use]
    pub fn with_test_session_size(mut self, size: usize) -> Self {
        self.test_session_size = size;
        self
    }

    /// The PC variant historically allowed tests with a single question; the
    /// web variants require a full ten. Both are points on this knob.
    #[must_use]
    pub fn with_min_pool_for_test(mut self, min: usize) -> Self {
        self.min_pool_for_test = min;
        self
    }

    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
