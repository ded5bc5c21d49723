//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{
    Catalog,
    CatalogError,
};
use crate::config::MatcherError;

/// A successfully loaded catalog.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub path: PathBuf,
    /// Detected target language, see [`crate::catalog::detect_language`].
    pub language: Option<String>,
    pub catalog: Catalog,
}

/// A catalog that failed to load. The scan continues without it.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: CatalogError,
}

/// Result of loading a set of catalogs, sorted by path.
#[derive(Debug, Default)]
pub struct WorkspaceIndex {
    pub catalogs: Vec<LoadedCatalog>,
    pub failures: Vec<LoadFailure>,
}

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Error when the workspace root cannot be used
    #[error("Invalid workspace path: {0}")]
    InvalidPath(String),
    /// Error when the configured patterns cannot be compiled
    #[error("Invalid file patterns: {0}")]
    Matcher(#[from] MatcherError),
    /// Error when a loading task panicked or was cancelled
    #[error("Catalog loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    /// Error when the load limiter was closed
    #[error("Catalog loading was cancelled")]
    Cancelled(#[from] tokio::sync::AcquireError),
}
