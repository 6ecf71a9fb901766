//! Parsing of synthetic accessor names into structured requests.

use std::collections::HashSet;

use crate::locale::Locale;

/// The attribute names a host type declared as translatable.
///
/// Declared once per host type and consulted before any name is treated
/// as a translation accessor. An unregistered attribute segment means
/// "not ours": real members that merely look like `word_xx` are never
/// hijacked, the parse simply declines.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    /// Registered attribute names.
    names: HashSet<String>,
}

impl AttributeSet {
    /// Declare the set of translatable attribute names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    /// Whether `attribute` was declared translatable.
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        self.names.contains(attribute)
    }

    /// Iterate the declared names (no particular order).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// One parsed synthetic accessor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorRequest {
    /// The validated attribute segment.
    pub attribute: String,
    /// The locale segment; `None` for the "all" form.
    pub locale: Option<Locale>,
    /// Whether every stored translation was requested.
    pub all: bool,
    /// Whether the name carried the assignment marker.
    pub is_write: bool,
}

impl AccessorRequest {
    /// Parse either accessor form, attribute-locale form first.
    #[must_use]
    pub fn parse(name: &str, attributes: &AttributeSet) -> Option<Self> {
        if let Some((attribute, locale, is_write)) = parse_attribute_locale(name, attributes) {
            return Some(Self { attribute, locale: Some(locale), all: false, is_write });
        }
        parse_all(name, attributes)
            .map(|attribute| Self { attribute, locale: None, all: true, is_write: false })
    }
}

/// Parse `<attribute>_<xx>`, optionally followed by `=`.
///
/// The attribute segment must be lowercase letters/underscores and a
/// member of `attributes`; the locale segment exactly two lowercase
/// letters. Anything else is a definite no-match, never an error.
///
/// # Examples
/// - `title_en` → `("title", en, false)`
/// - `title_en=` → `("title", en, true)`
/// - `updated_at` → `None` (`at` is not a registered attribute's locale)
#[must_use]
pub fn parse_attribute_locale(
    name: &str,
    attributes: &AttributeSet,
) -> Option<(String, Locale, bool)> {
    let (body, is_write) = name.strip_suffix('=').map_or((name, false), |body| (body, true));

    let (attribute, locale) = body.rsplit_once('_')?;
    if !is_locale_segment(locale) || !is_attribute_segment(attribute) {
        return None;
    }
    if !attributes.contains(attribute) {
        return None;
    }

    Some((attribute.to_string(), Locale::new(locale), is_write))
}

/// Parse `<attribute>_all` (with `_alls` tolerated), validating the
/// attribute segment the same way as [`parse_attribute_locale`].
#[must_use]
pub fn parse_all(name: &str, attributes: &AttributeSet) -> Option<String> {
    let attribute = name.strip_suffix("_alls").or_else(|| name.strip_suffix("_all"))?;
    if !is_attribute_segment(attribute) || !attributes.contains(attribute) {
        return None;
    }
    Some(attribute.to_string())
}

/// Exactly two lowercase ASCII letters.
fn is_locale_segment(segment: &str) -> bool {
    segment.len() == 2 && segment.bytes().all(|byte| byte.is_ascii_lowercase())
}

/// Nonempty lowercase ASCII letters and underscores.
fn is_attribute_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|byte| byte.is_ascii_lowercase() || byte == b'_')
}
