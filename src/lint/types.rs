//! Lint diagnostic types.

use serde::Serialize;

use crate::types::SourceRange;

/// Lint rules, named by their kebab-case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// `(context, source, comment)` occurs more than once.
    DuplicateMessage,
    /// A source placeholder is missing from the translation.
    PlaceholderMismatch,
    /// The translation references a placeholder the source does not have.
    ExtraPlaceholder,
    /// Finished message without text.
    EmptyTranslation,
    Unfinished,
    Obsolete,
    /// Numerus flag and `<numerusform>`s disagree.
    NumerusForms,
}

impl Rule {
    pub const ALL: [Self; 7] = [
        Self::DuplicateMessage,
        Self::PlaceholderMismatch,
        Self::ExtraPlaceholder,
        Self::EmptyTranslation,
        Self::Unfinished,
        Self::Obsolete,
        Self::NumerusForms,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DuplicateMessage => "duplicate-message",
            Self::PlaceholderMismatch => "placeholder-mismatch",
            Self::ExtraPlaceholder => "extra-placeholder",
            Self::EmptyTranslation => "empty-translation",
            Self::Unfinished => "unfinished",
            Self::Obsolete => "obsolete",
            Self::NumerusForms => "numerus-forms",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A finding about one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: Rule,
    pub severity: Severity,
    pub message: String,
    /// Context name of the offending message.
    pub context: String,
    /// Source string of the offending message.
    pub source: String,
    pub range: SourceRange,
}
