use thiserror::Error;

use crate::types::SourcePosition;

/// Errors raised while loading a `.ts` catalog.
///
/// Any of these fails the load of the whole catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Error when failing to read the catalog file
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not well-formed XML
    #[error("Malformed XML at {position}: {source}")]
    Xml {
        position: SourcePosition,
        #[source]
        source: quick_xml::Error,
    },
    #[error("Expected <TS> as the root element, found <{found}>")]
    UnexpectedRoot { found: String },
    #[error("Document has no root element")]
    MissingRoot,
    #[error("Unexpected content after the root element at {position}: <{found}>")]
    TrailingContent { found: String, position: SourcePosition },
    #[error("Document ended before <{element}> was closed")]
    UnclosedElement { element: String },
    #[error("<{parent}> at {position} has no <{element}>")]
    MissingElement { element: &'static str, parent: &'static str, position: SourcePosition },
    #[error("<{parent}> at {position} has more than one <{element}>")]
    DuplicateElement { element: &'static str, parent: &'static str, position: SourcePosition },
    #[error("Invalid value '{value}' for attribute '{attribute}' at {position}")]
    InvalidAttribute { attribute: &'static str, value: String, position: SourcePosition },
}
