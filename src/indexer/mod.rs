//! Workspace discovery and concurrent catalog loading.
/// Indexer type definitions
pub mod types;
/// Workspace indexer
pub mod workspace;

pub use types::{
    IndexerError,
    LoadFailure,
    LoadedCatalog,
    WorkspaceIndex,
};
pub use workspace::WorkspaceIndexer;
