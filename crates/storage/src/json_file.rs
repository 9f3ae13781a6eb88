//! File-backed history adapter.
//!
//! The whole history lives under one fixed key: a single JSON file holding an
//! array of results, newest first. There is no versioning or migration; an
//! unreadable file reads as an empty history.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::warn;

use quiz_core::model::ExamResult;

use crate::repository::{HistoryRepository, StorageError};

/// Default file name for the persisted history, one per app data directory.
pub const HISTORY_FILE_NAME: &str = "exam-history.json";

/// Stores the exam history as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses [`HISTORY_FILE_NAME`] inside the given directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(HISTORY_FILE_NAME))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryRepository for JsonFileHistory {
    async fn load(&self) -> Result<Vec<ExamResult>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        match serde_json::from_str(&raw) {
            Ok(results) => Ok(results),
            Err(e) => {
                // Corrupt history is not worth failing a session over.
                warn!("discarding unreadable history at {}: {e}", self.path.display());
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, results: &[ExamResult]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(results)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| StorageError::Io(e.to_string()))
    }
}
