//! Qt Linguist `.ts` catalogs: model, reader, writer and lookup.
/// Catalog load errors
mod error;
/// Language detection
pub mod language;
/// Runtime lookup
pub mod lookup;
/// Document model
pub mod model;
/// `%N` placeholder extraction
pub mod placeholders;
/// XML reader
pub mod reader;
/// Progress statistics
pub mod stats;
/// XML writer
pub mod writer;

pub use error::CatalogError;
pub use language::detect_language;
pub use lookup::{
    Entry,
    LookupMode,
    Translator,
};
pub use model::{
    Catalog,
    Context,
    LENGTH_VARIANT_SEPARATOR,
    Location,
    LocationLine,
    Message,
    MessageKey,
    TranslationStatus,
};
pub use reader::{
    load_catalog,
    parse_catalog,
};
pub use stats::CatalogStats;
pub use writer::write_catalog;
