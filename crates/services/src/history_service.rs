//! Bounded exam-history log.
//!
//! Persistence failures are never allowed to spoil a finished session: reads
//! degrade to an empty history, writes are logged and swallowed.

use std::sync::Arc;

use log::warn;

use quiz_core::model::ExamResult;
use storage::repository::HistoryRepository;

#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    limit: usize,
}

impl HistoryService {
    #[must_use]
    pub fn new(repo: Arc<dyn HistoryRepository>, limit: usize) -> Self {
        Self { repo, limit }
    }

    /// Past results, newest first. Unreadable history reads as empty.
    pub async fn recent(&self) -> Vec<ExamResult> {
        match self.repo.load().await {
            Ok(results) => results,
            Err(e) => {
                warn!("could not read exam history: {e}");
                Vec::new()
            }
        }
    }

    /// Prepends a result and persists the truncated log.
    ///
    /// Returns the new in-memory log either way; a failed write only warns.
    pub async fn record(&self, result: ExamResult) -> Vec<ExamResult> {
        let mut results = self.recent().await;
        results.insert(0, result);
        results.truncate(self.limit);

        if let Err(e) = self.repo.save(&results).await {
            warn!("could not save exam history: {e}");
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::fixed_now;
    use storage::repository::{MemoryHistory, StorageError};

    fn result(score: u32) -> ExamResult {
        ExamResult::new(fixed_now(), score, 10)
    }

    #[tokio::test]
    async fn history_is_bounded_and_newest_first() {
        let service = HistoryService::new(Arc::new(MemoryHistory::new()), 10);

        for score in 0..12 {
            service.record(result(score)).await;
        }

        let recent = service.recent().await;
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].score, 11);
        assert_eq!(recent[9].score, 2);
    }

    struct BrokenStore;

    #[async_trait]
    impl HistoryRepository for BrokenStore {
        async fn load(&self) -> Result<Vec<ExamResult>, StorageError> {
            Err(StorageError::Io("storage disabled".into()))
        }

        async fn save(&self, _results: &[ExamResult]) -> Result<(), StorageError> {
            Err(StorageError::Io("storage disabled".into()))
        }
    }

    #[tokio::test]
    async fn broken_storage_still_yields_the_result() {
        let service = HistoryService::new(Arc::new(BrokenStore), 10);

        assert!(service.recent().await.is_empty());

        let log = service.record(result(7)).await;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].score, 7);
    }
}
