//! Question-source loading.
//!
//! Sources are JSON documents (an array of question records) reachable over
//! HTTP or on the local filesystem. Each source loads independently and a
//! failing source degrades to an empty contribution; only when every
//! requested source fails does the caller surface an error message. URL
//! fetches carry a cache-busting timestamp so question content can never go
//! stale behind an HTTP cache.

use std::fmt;
use std::path::PathBuf;

use chrono::Utc;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;

use quiz_core::Pool;
use quiz_core::model::{Origin, RawQuestion};

use crate::error::LoaderError;

/// Where a question document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for QuestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionSource::Url(url) => write!(f, "{url}"),
            QuestionSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl QuestionSource {
    /// Interprets strings with an http(s) scheme as URLs, everything else as
    /// a file path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            QuestionSource::Url(raw.to_owned())
        } else {
            QuestionSource::File(PathBuf::from(raw))
        }
    }
}

/// Outcome of one full load cycle across all requested sources.
#[derive(Debug, Clone)]
pub struct PoolLoad {
    pub pool: Pool,
    pub requested: usize,
    pub failed: usize,
}

impl PoolLoad {
    /// True when no source contributed anything because every fetch failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.requested > 0 && self.failed == self.requested
    }
}

/// Manifest document listing available question files.
#[derive(Debug, Deserialize)]
struct Manifest {
    files: Vec<String>,
}

/// Fetches and parses question documents.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one source, tolerating failure.
    ///
    /// Returns `None` when the fetch or parse failed; the error is logged,
    /// never propagated.
    pub async fn load(&self, source: &QuestionSource) -> Option<Vec<RawQuestion>> {
        match self.fetch(source).await {
            Ok(records) => {
                debug!("loaded {} records from {source}", records.len());
                Some(records)
            }
            Err(e) => {
                warn!("failed to load questions from {source}: {e}");
                None
            }
        }
    }

    /// Load the internal source and, when requested, the external source in
    /// parallel, then build the deduplicated pool from both.
    pub async fn load_pool(
        &self,
        internal: &QuestionSource,
        external: Option<&QuestionSource>,
    ) -> PoolLoad {
        let (internal_records, external_records) = match external {
            Some(external) => tokio::join!(self.load(internal), self.load(external)),
            None => (self.load(internal).await, None),
        };

        let requested = 1 + usize::from(external.is_some());
        let mut failed = 0;
        let mut sources = Vec::new();

        match internal_records {
            Some(records) => sources.push((Origin::Internal, records)),
            None => failed += 1,
        }
        if external.is_some() {
            match external_records {
                Some(records) => sources.push((Origin::ExternalTeacher, records)),
                None => failed += 1,
            }
        }

        let pool = Pool::build(sources);
        debug!(
            "pool built: {} questions ({} duplicates, {} malformed, {failed}/{requested} sources failed)",
            pool.len(),
            pool.stats().duplicates,
            pool.stats().malformed,
        );

        PoolLoad {
            pool,
            requested,
            failed,
        }
    }

    /// Read a manifest document and return the question filenames it lists,
    /// with configuration, manifest, and service-worker JSON filtered out.
    ///
    /// # Errors
    ///
    /// Returns `LoaderError` when the manifest itself cannot be fetched or
    /// parsed; unlike question sources, a broken manifest is not degradable.
    pub async fn discover(&self, manifest: &QuestionSource) -> Result<Vec<String>, LoaderError> {
        let manifest: Manifest = match manifest {
            QuestionSource::Url(url) => {
                let response = self.get_fresh(url).await?;
                response.json().await?
            }
            QuestionSource::File(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                serde_json::from_str(&raw)?
            }
        };

        Ok(manifest
            .files
            .into_iter()
            .filter(|name| is_question_file(name))
            .collect())
    }

    async fn fetch(&self, source: &QuestionSource) -> Result<Vec<RawQuestion>, LoaderError> {
        match source {
            QuestionSource::Url(url) => {
                let response = self.get_fresh(url).await?;
                Ok(response.json().await?)
            }
            QuestionSource::File(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                Ok(serde_json::from_str(&raw)?)
            }
        }
    }

    async fn get_fresh(&self, url: &str) -> Result<reqwest::Response, LoaderError> {
        let response = self
            .client
            .get(url)
            .query(&[("t", Utc::now().timestamp_millis())])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LoaderError::HttpStatus(response.status()));
        }
        Ok(response)
    }
}

/// Deployment convention: question files are plain JSON, while manifest,
/// configuration, and service-worker JSON never enter the pool.
fn is_question_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".json")
        && !lower.contains("manifest")
        && !lower.contains("config")
        && !lower.contains("service-worker")
        && !lower.starts_with("sw.")
}
