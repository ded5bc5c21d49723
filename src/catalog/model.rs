//! In-memory model of a Qt Linguist `.ts` catalog.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::SourcePosition;

/// Lifecycle state of a translation, from the `type` attribute of `<translation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// No `type` attribute: approved by a translator.
    #[default]
    Finished,
    /// `type="unfinished"`: awaiting review.
    Unfinished,
    /// `type="obsolete"`: no longer referenced by the application.
    Obsolete,
    /// `type="vanished"`: Qt 5 variant of obsolete.
    Vanished,
}

impl TranslationStatus {
    /// Parses the value of the `type` attribute.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    /// Value of the `type` attribute, `None` for finished translations.
    #[must_use]
    pub const fn as_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }

    /// Whether the message is still bound to a live source string.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Finished | Self::Unfinished)
    }
}

impl std::fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_attribute().unwrap_or("finished"))
    }
}

/// Separates the `<lengthvariant>`s of one translation text, longest first.
pub const LENGTH_VARIANT_SEPARATOR: char = '\u{9c}';

/// Splits a translation text into its length variants.
pub fn length_variants(text: &str) -> impl Iterator<Item = &str> {
    text.split(LENGTH_VARIANT_SEPARATOR)
}

/// Value of the `line` attribute of a `<location>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationLine {
    /// `line="75"`
    Absolute(u32),
    /// `line="+12"` or `line="-3"`, as written by `lupdate -locations relative`.
    ///
    /// The offset is relative to the previous location in the same file.
    Relative(i32),
}

impl LocationLine {
    /// Parses an attribute value. A leading sign makes the line relative.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.starts_with(['+', '-']) {
            raw.parse().ok().map(Self::Relative)
        } else {
            raw.parse().ok().map(Self::Absolute)
        }
    }
}

impl std::fmt::Display for LocationLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute(line) => write!(f, "{line}"),
            Self::Relative(offset) => write!(f, "{offset:+}"),
        }
    }
}

/// A `<location>` reference into the application's sources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// Omitted in relative mode when the file is the same as in the previous location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Absent for locations that only name a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LocationLine>,
}

/// Composite lookup key of a message.
///
/// An absent comment and an empty `<comment>` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    pub comment: String,
}

impl MessageKey {
    #[must_use]
    pub fn new(context: &str, source: &str, comment: Option<&str>) -> Self {
        Self {
            context: context.to_string(),
            source: source.to_string(),
            comment: comment.unwrap_or_default().to_string(),
        }
    }
}

/// A single `<message>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// `id` attribute of id-based catalogs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `numerus="yes"`: the translation is split into `<numerusform>`s.
    pub numerus: bool,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    /// Disambiguation between identical source strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_comment: Option<String>,
    /// Developer note shown to translators (`<extracomment>`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
    pub translation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub numerus_forms: Vec<String>,
    pub status: TranslationStatus,
    /// Start of the `<message>` tag in the catalog file.
    #[serde(skip)]
    pub position: SourcePosition,
}

impl Message {
    /// Lookup key of this message inside `context`.
    #[must_use]
    pub fn key(&self, context: &str) -> MessageKey {
        MessageKey::new(context, &self.source, self.comment.as_deref())
    }

    /// True when the translation carries no text at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.translated_texts().all(str::is_empty)
    }

    /// Every translated text of the message: the numerus forms, or the single translation,
    /// with length variants split apart.
    pub fn translated_texts(&self) -> impl Iterator<Item = &str> {
        let forms = if self.numerus_forms.is_empty() {
            std::slice::from_ref(&self.translation)
        } else {
            self.numerus_forms.as_slice()
        };
        forms.iter().flat_map(|form| length_variants(form))
    }
}

/// A `<context>` element, usually one per UI class.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Context {
    pub name: String,
    pub messages: Vec<Message>,
    #[serde(skip)]
    pub position: SourcePosition,
}

/// A parsed `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// `version` attribute of `<TS>`, e.g. `2.1`.
    pub version: Option<String>,
    /// Target language, e.g. `de_DE`.
    pub language: Option<String>,
    pub source_language: Option<String>,
    /// Whether the document carried a `<!DOCTYPE TS>` preamble.
    #[serde(skip)]
    pub has_doctype: bool,
    pub contexts: Vec<Context>,
}

impl Catalog {
    /// Iterates `(context name, message)` pairs in document order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|context| context.messages.iter().map(|m| (context.name.as_str(), m)))
    }

    /// Finds the first context named `name`.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// Number of messages across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }

    /// Messages by key, keeping the first of each duplicate.
    fn first_occurrences(&self) -> HashMap<MessageKey, &Message> {
        let mut by_key = HashMap::new();
        for (context, message) in self.messages() {
            by_key.entry(message.key(context)).or_insert(message);
        }
        by_key
    }

    /// Compares message sets, statuses and source locations, ignoring layout and file positions.
    ///
    /// Duplicate keys are compared by their first occurrence, the same way lookups resolve them.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.language != other.language || self.message_count() != other.message_count() {
            return false;
        }

        let (ours, theirs) = (self.first_occurrences(), other.first_occurrences());

        ours.len() == theirs.len()
            && ours.iter().all(|(key, message)| {
                theirs.get(key).is_some_and(|other| {
                    other.status == message.status
                        && other.numerus == message.numerus
                        && other.translation == message.translation
                        && other.numerus_forms == message.numerus_forms
                        && other.locations == message.locations
                })
            })
    }
}
