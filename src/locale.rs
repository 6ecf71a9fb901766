//! Locale identifiers and the ambient current-locale source.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// A canonical locale identifier (e.g. `en`, `fr-CA`).
///
/// Construction normalizes arbitrary spellings to one canonical form:
/// subtags are split on `-` or `_`, the language subtag is lowercased,
/// two-letter subtags after it are uppercased, and everything is joined
/// with `-`. `FR_ca` and `fr-CA` therefore name the same locale.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Create a locale from any spelling of its code.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(canonicalize(code))
    }

    /// The canonical text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Normalize a locale code (lowercase language, uppercase two-letter
/// region, `-` separator).
fn canonicalize(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .filter(|subtag| !subtag.is_empty())
        .enumerate()
        .map(|(position, subtag)| {
            if position > 0 && subtag.len() == 2 {
                subtag.to_ascii_uppercase()
            } else {
                subtag.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Supplies the locale used when a caller does not pass one explicitly.
pub trait LocaleProvider {
    /// The locale in effect for the current unit of work.
    fn current_locale(&self) -> Locale;
}

/// A provider that always answers with one fixed locale.
#[derive(Debug, Clone)]
pub struct StaticLocale {
    /// The locale every query answers with.
    locale: Locale,
}

impl StaticLocale {
    /// Create a provider fixed to `code`.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self { locale: Locale::new(code) }
    }
}

impl LocaleProvider for StaticLocale {
    fn current_locale(&self) -> Locale {
        self.locale.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    // Already canonical
    #[case("en", "en")]
    #[case("fr-CA", "fr-CA")]
    // Case and separator normalization
    #[case("EN", "en")]
    #[case("fr_ca", "fr-CA")]
    #[case("FR-ca", "fr-CA")]
    #[case("pt_BR", "pt-BR")]
    // Longer subtags are lowercased, not treated as regions
    #[case("az-Cyrl-AZ", "az-cyrl-AZ")]
    // Whitespace and stray separators
    #[case("  en  ", "en")]
    #[case("fr--CA", "fr-CA")]
    fn locale_new_canonicalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Locale::new(input).as_str(), expected);
    }

    #[rstest]
    fn locales_compare_by_canonical_form() {
        assert_that!(Locale::new("FR_ca"), eq(&Locale::new("fr-CA")));
        assert_that!(Locale::new("en"), not(eq(&Locale::new("en-US"))));
    }

    #[rstest]
    fn locale_serializes_as_bare_string() {
        let json = serde_json::to_string(&Locale::new("fr-CA")).unwrap();

        assert_that!(json, eq("\"fr-CA\""));
    }

    #[rstest]
    fn static_locale_always_answers_with_its_locale() {
        let provider = StaticLocale::new("ja");

        assert_that!(provider.current_locale(), eq(&Locale::new("ja")));
        assert_that!(provider.current_locale(), eq(&Locale::new("ja")));
    }
}
