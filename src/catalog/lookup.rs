//! Runtime lookup over a loaded catalog.

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

use super::model::{
    Catalog,
    MessageKey,
    TranslationStatus,
    length_variants,
};

/// Which messages a [`Translator`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LookupMode {
    /// Obsolete and vanished messages are left out of the map.
    #[default]
    Strict,
    /// Every message is kept, for reference and export tooling.
    Permissive,
}

/// A translation as stored in the lookup map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub translation: String,
    pub numerus_forms: Vec<String>,
    pub status: TranslationStatus,
}

impl Entry {
    /// Text served at runtime, `None` when the caller must fall back to the source.
    ///
    /// Of several length variants the first, longest one is served.
    fn served_text(&self) -> Option<&str> {
        if !self.status.is_active() {
            return None;
        }
        let text = self.numerus_forms.first().unwrap_or(&self.translation);
        length_variants(text).next().filter(|variant| !variant.is_empty())
    }
}

/// Immutable `(context, source, comment)` → translation map of one catalog.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    mode: LookupMode,
    language: Option<String>,
    entries: HashMap<MessageKey, Entry>,
}

impl Translator {
    /// Builds the lookup map. For duplicate keys the first message wins.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog, mode: LookupMode) -> Self {
        let mut entries = HashMap::with_capacity(catalog.message_count());

        for (context, message) in catalog.messages() {
            if mode == LookupMode::Strict && !message.status.is_active() {
                continue;
            }

            let key = message.key(context);
            if entries.contains_key(&key) {
                tracing::warn!(
                    context,
                    source = %message.source,
                    line = message.position.line + 1,
                    "Duplicate message ignored"
                );
                continue;
            }
            entries.insert(key, Entry {
                translation: message.translation.clone(),
                numerus_forms: message.numerus_forms.clone(),
                status: message.status,
            });
        }

        tracing::debug!(entries = entries.len(), ?mode, "Translator built");
        Self { mode, language: catalog.language.clone(), entries }
    }

    /// Finds the entry for a key.
    ///
    /// A lookup with a comment that has no exact match retries without the comment.
    #[must_use]
    pub fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Entry> {
        let exact = self.entries.get(&MessageKey::new(context, source, comment));
        match (exact, comment) {
            (Some(entry), _) => Some(entry),
            (None, Some(comment)) if !comment.is_empty() => {
                self.entries.get(&MessageKey::new(context, source, None))
            }
            (None, _) => None,
        }
    }

    /// Returns the translation of `source`, or `source` itself when the key is missing,
    /// obsolete or blank.
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        self.find(context, source, comment).and_then(Entry::served_text).unwrap_or(source)
    }

    /// Stored numerus forms of a key. Choosing a form is up to the caller.
    #[must_use]
    pub fn numerus_forms(&self, context: &str, source: &str, comment: Option<&str>) -> &[String] {
        self.find(context, source, comment).map_or(&[], |entry| entry.numerus_forms.as_slice())
    }

    #[must_use]
    pub const fn mode(&self) -> LookupMode {
        self.mode
    }

    /// Target language declared by the catalog.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::catalog::reader::parse_catalog;

    #[fixture]
    fn catalog() -> Catalog {
        parse_catalog(
            r#"<!DOCTYPE TS><TS version="2.1" language="en_PIRATE">
<context>
    <name>EnableToolAction</name>
    <message><source>Box tool</source><translation>Bux tuul</translation></message>
    <message><source>Box tool</source><translation>Second box</translation></message>
    <message><source>Pick</source><comment>noun</comment><translation>Pickaxe</translation></message>
    <message><source>Pick</source><translation>Plunder</translation></message>
    <message><source>Zoom</source><translation type="unfinished">Spyglass</translation></message>
    <message><source>Lineout</source><translation type="unfinished"></translation></message>
</context>
<context>
    <name>QvisEngineWindow</name>
    <message><source>Close engine</source><translation type="obsolete">Scuttle engine</translation></message>
    <message><source>Interrupt engine</source><translation type="vanished">Belay engine</translation></message>
    <message numerus="yes"><source>%n engine(s)</source><translation><numerusform>%n engine</numerusform><numerusform>%n engines</numerusform></translation></message>
</context>
</TS>"#,
        )
        .unwrap()
    }

    #[rstest]
    fn test_translate_finished(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Box tool", None), eq("Bux tuul"));
    }

    #[rstest]
    fn test_translate_is_idempotent(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        let first = translator.translate("EnableToolAction", "Box tool", None);
        let second = translator.translate("EnableToolAction", "Box tool", None);

        assert_that!(first, eq(second));
    }

    #[rstest]
    fn test_first_duplicate_wins(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Box tool", None), eq("Bux tuul"));
    }

    #[rstest]
    fn test_missing_key_falls_back_to_source(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Query over time", None), eq("Query over time"));
        assert_that!(translator.translate("OperatorNames", "Box tool", None), eq("Box tool"));
    }

    #[rstest]
    fn test_comment_disambiguates(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Pick", Some("noun")), eq("Pickaxe"));
        assert_that!(translator.translate("EnableToolAction", "Pick", None), eq("Plunder"));
    }

    #[rstest]
    fn test_unknown_comment_falls_back_to_uncommented(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Pick", Some("verb")), eq("Plunder"));
        assert_that!(translator.translate("EnableToolAction", "Box tool", Some("")), eq("Bux tuul"));
    }

    #[rstest]
    fn test_unfinished_is_served(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Zoom", None), eq("Spyglass"));
    }

    #[rstest]
    fn test_blank_translation_falls_back_but_is_found(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.translate("EnableToolAction", "Lineout", None), eq("Lineout"));
        let entry = translator.find("EnableToolAction", "Lineout", None).unwrap();
        assert_that!(entry.translation, eq(""));
        assert_that!(entry.status, eq(TranslationStatus::Unfinished));
    }

    #[rstest]
    fn test_strict_mode_excludes_obsolete(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert!(translator.find("QvisEngineWindow", "Close engine", None).is_none());
        assert!(translator.find("QvisEngineWindow", "Interrupt engine", None).is_none());
        assert_that!(translator.translate("QvisEngineWindow", "Close engine", None), eq("Close engine"));
        assert_that!(translator.len(), eq(6));
    }

    #[rstest]
    fn test_permissive_mode_retains_obsolete_but_does_not_serve_it(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Permissive);

        let entry = translator.find("QvisEngineWindow", "Close engine", None).unwrap();
        assert_that!(entry.translation, eq("Scuttle engine"));
        assert_that!(entry.status, eq(TranslationStatus::Obsolete));
        assert_that!(translator.translate("QvisEngineWindow", "Close engine", None), eq("Close engine"));
        assert_that!(translator.len(), eq(8));
        assert_that!(translator.mode(), eq(LookupMode::Permissive));
    }

    #[rstest]
    fn test_numerus_forms(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_eq!(
            translator.numerus_forms("QvisEngineWindow", "%n engine(s)", None),
            ["%n engine".to_string(), "%n engines".to_string()]
        );
        assert_that!(translator.translate("QvisEngineWindow", "%n engine(s)", None), eq("%n engine"));
        assert!(translator.numerus_forms("QvisEngineWindow", "Missing", None).is_empty());
    }

    #[rstest]
    fn test_first_length_variant_is_served() {
        let catalog = parse_catalog(
            r#"<TS><context><name>QvisEngineWindow</name>
    <message><source>Close engine</source><translation variants="yes">
        <lengthvariant>Scuttle th' engine</lengthvariant>
        <lengthvariant>Scuttle</lengthvariant>
    </translation></message>
    <message><source>Kill engine</source><translation variants="yes">
        <lengthvariant></lengthvariant>
        <lengthvariant>Sink</lengthvariant>
    </translation></message>
</context></TS>"#,
        )
        .unwrap();
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(
            translator.translate("QvisEngineWindow", "Close engine", None),
            eq("Scuttle th' engine")
        );
        assert_that!(translator.translate("QvisEngineWindow", "Kill engine", None), eq("Kill engine"));
    }

    #[rstest]
    fn test_language(catalog: Catalog) {
        let translator = Translator::from_catalog(&catalog, LookupMode::Strict);

        assert_that!(translator.language(), some(eq("en_PIRATE")));
        assert!(!translator.is_empty());
        assert!(Translator::default().is_empty());
    }
}
