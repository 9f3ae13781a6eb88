use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use quiz_core::model::ExamResult;

/// Errors surfaced by history adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence contract for the bounded exam-history log.
///
/// Adapters store the full list as one unit; bounding and ordering are the
/// caller's responsibility. A read of corrupt or missing data must not fail
/// the caller — adapters either recover to an empty list themselves or
/// return an error the history service downgrades.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Load all persisted results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load(&self) -> Result<Vec<ExamResult>, StorageError>;

    /// Replace the persisted list with `results`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn save(&self, results: &[ExamResult]) -> Result<(), StorageError>;
}

/// In-memory adapter for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    results: Mutex<Vec<ExamResult>>,
}

impl MemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for MemoryHistory {
    async fn load(&self) -> Result<Vec<ExamResult>, StorageError> {
        let results = self
            .results
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(results.clone())
    }

    async fn save(&self, results: &[ExamResult]) -> Result<(), StorageError> {
        let mut stored = self
            .results
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *stored = results.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn memory_history_round_trips() {
        let repo = MemoryHistory::new();
        assert!(repo.load().await.unwrap().is_empty());

        let results = vec![ExamResult::new(fixed_now(), 7, 10)];
        repo.save(&results).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), results);
    }
}
