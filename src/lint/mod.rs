//! Static checks over a catalog.
/// Diagnostic generation
mod diagnostics;
/// Diagnostic types
mod types;

pub use diagnostics::lint_catalog;
pub use types::{
    Diagnostic,
    Rule,
    Severity,
};
