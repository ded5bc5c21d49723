//! Target language detection.

use std::path::Path;

use super::model::Catalog;

/// Checks the shape of a language subtag (`de`, `fil`).
fn is_language_subtag(part: &str) -> bool {
    (2..=3).contains(&part.len()) && part.chars().all(|c| c.is_ascii_lowercase())
}

/// Checks the shape of a region subtag (`DE`, `419`).
fn is_region_subtag(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

/// Detects the language from the Qt naming convention `<name>_<lang>[_<REGION>].ts`.
///
/// # Examples
/// - `visit_de.ts` → `de`
/// - `translations/app_pt_BR.ts` → `pt_BR`
/// - `visit_pirate.ts` → `None`
fn detect_language_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let mut parts = stem.rsplit('_');
    let last = parts.next()?;
    let previous = parts.next();

    if is_region_subtag(last) {
        let language = previous.filter(|part| is_language_subtag(part))?;
        // A bare `_DE` needs a name in front of `<lang>_`.
        parts.next()?;
        return Some(format!("{language}_{last}"));
    }
    if is_language_subtag(last) && previous.is_some() {
        return Some(last.to_string());
    }
    None
}

/// Language of a catalog: the `language` attribute of `<TS>`, else the file name.
#[must_use]
pub fn detect_language(catalog: &Catalog, path: &Path) -> Option<String> {
    catalog
        .language
        .as_ref()
        .filter(|language| !language.is_empty())
        .cloned()
        .or_else(|| detect_language_from_path(path))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("translations/visit_de.ts", Some("de"))]
    #[case("/path/to/app_pt_BR.ts", Some("pt_BR"))]
    #[case("app_es_419.ts", Some("es_419"))]
    #[case("my_app_fil.ts", Some("fil"))]
    #[case("visit_pirate.ts", None)]
    #[case("de.ts", None)]
    #[case("pt_BR.ts", None)]
    #[case("app_DE.ts", None)]
    #[case("app_De.ts", None)]
    fn test_detect_language_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(detect_language_from_path(Path::new(path)).as_deref(), expected);
    }

    #[rstest]
    fn test_attribute_takes_precedence() {
        let catalog = Catalog { language: Some("en_PIRATE".to_string()), ..Catalog::default() };

        assert_eq!(detect_language(&catalog, Path::new("visit_de.ts")).as_deref(), Some("en_PIRATE"));
    }

    #[rstest]
    fn test_empty_attribute_uses_path() {
        let catalog = Catalog { language: Some(String::new()), ..Catalog::default() };

        assert_eq!(detect_language(&catalog, Path::new("visit_de.ts")).as_deref(), Some("de"));
        assert_eq!(detect_language(&Catalog::default(), Path::new("visit.ts")), None);
    }
}
