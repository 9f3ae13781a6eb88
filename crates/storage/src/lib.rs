#![forbid(unsafe_code)]

pub mod json_file;
pub mod repository;

pub use json_file::JsonFileHistory;
pub use repository::{HistoryRepository, MemoryHistory, StorageError};
