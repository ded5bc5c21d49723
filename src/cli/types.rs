//! CLI error and outcome types.

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::indexer::IndexerError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error("{}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Problems were found, e.g. lint errors or unformatted files.
    Failure,
}

impl Outcome {
    /// `Failure` when the condition holds.
    #[must_use]
    pub const fn failure_if(condition: bool) -> Self {
        if condition { Self::Failure } else { Self::Success }
    }

    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failure => ExitCode::FAILURE,
        }
    }
}
