//! JSON export of catalogs.

use serde_json::{
    Map,
    Value,
};

use crate::catalog::Catalog;
use crate::catalog::model::length_variants;

/// Separates comment and source in exported keys (gettext's msgctxt convention).
pub const COMMENT_SEPARATOR: char = '\u{4}';

/// Options for [`export_json`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Also export obsolete and vanished messages.
    pub include_obsolete: bool,
    /// Also export messages without translated text.
    pub include_blank: bool,
}

/// Exported key of a message: the source, prefixed by `comment\u{4}` when disambiguated.
fn export_key(source: &str, comment: Option<&str>) -> String {
    match comment.filter(|comment| !comment.is_empty()) {
        Some(comment) => format!("{comment}{COMMENT_SEPARATOR}{source}"),
        None => source.to_string(),
    }
}

/// Text exported for a translation: its first length variant.
fn exported_text(text: &str) -> Value {
    Value::String(length_variants(text).next().unwrap_or_default().to_string())
}

/// Exports translations as `{context: {source: translation}}`.
///
/// Numerus messages export their forms as an array. Only the first length variant of
/// a text is exported. For duplicate keys the first message wins.
///
/// # Examples
/// ```
/// use ts_catalog::catalog::parse_catalog;
/// use ts_catalog::export::{export_json, ExportOptions};
///
/// let catalog = parse_catalog(
///     "<TS><context><name>EnableToolAction</name><message>\
///      <source>Box tool</source><translation>Bux tuul</translation>\
///      </message></context></TS>",
/// ).unwrap();
///
/// let json = export_json(&catalog, &ExportOptions::default());
/// assert_eq!(json["EnableToolAction"]["Box tool"], "Bux tuul");
/// ```
#[must_use]
pub fn export_json(catalog: &Catalog, options: &ExportOptions) -> Value {
    let mut contexts = Map::new();

    for (context, message) in catalog.messages() {
        if !options.include_obsolete && !message.status.is_active() {
            continue;
        }
        if !options.include_blank && message.is_blank() {
            continue;
        }

        let value = if message.numerus_forms.is_empty() {
            exported_text(&message.translation)
        } else {
            Value::Array(message.numerus_forms.iter().map(|form| exported_text(form)).collect())
        };

        let entries = contexts
            .entry(context.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(entries) = entries {
            entries
                .entry(export_key(&message.source, message.comment.as_deref()))
                .or_insert(value);
        }
    }

    Value::Object(contexts)
}
