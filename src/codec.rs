//! Serialization between a locale→value mapping and its column text.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::locale::Locale;

/// Raised when column text is present, non-trivial, and not a flat
/// locale→scalar object.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The column text is not valid JSON.
    #[error("Malformed translation data: {0}")]
    Parse(#[from] serde_json::Error),
    /// The column text is valid JSON with the wrong structure.
    #[error("Malformed translation data: {0}")]
    Shape(String),
}

/// In-memory mapping from locale to translated value for one attribute.
///
/// Backed by a sorted map so that [`encode`] output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TranslationSet {
    /// Locale → stored value.
    values: BTreeMap<Locale, Value>,
}

impl TranslationSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value for `locale`, if any.
    #[must_use]
    pub fn get(&self, locale: &Locale) -> Option<&Value> {
        self.values.get(locale)
    }

    /// Store `value` under `locale`, returning the previous value.
    pub fn insert(&mut self, locale: Locale, value: Value) -> Option<Value> {
        self.values.insert(locale, value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate pairs in canonical (sorted) locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &Value)> {
        self.values.iter()
    }

    /// The set as one flat JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values.iter().map(|(locale, value)| (locale.to_string(), value.clone())).collect(),
        )
    }
}

impl FromIterator<(Locale, Value)> for TranslationSet {
    fn from_iter<I: IntoIterator<Item = (Locale, Value)>>(pairs: I) -> Self {
        Self { values: pairs.into_iter().collect() }
    }
}

/// Whether a stored value counts as a translation on the read path.
///
/// `null` and the empty string do not; every other scalar does.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

/// Decode one backing column's text into a [`TranslationSet`].
///
/// Absent or trivially short text (fewer than two characters) decodes to
/// the empty set. Present text must be a flat JSON object whose keys are
/// locale identifiers and whose values are scalars.
///
/// # Errors
/// - The text is not valid JSON
/// - The document is not an object, or a value is itself nested
pub fn decode(raw: Option<&str>) -> Result<TranslationSet, CodecError> {
    let Some(raw) = raw else {
        return Ok(TranslationSet::new());
    };
    if raw.chars().count() < 2 {
        return Ok(TranslationSet::new());
    }

    let document: Value = serde_json::from_str(raw).inspect_err(|e| {
        tracing::warn!("Failed to parse translation column: {e}");
    })?;

    let Value::Object(entries) = document else {
        tracing::warn!("Translation column is not an object: {}", kind_of(&document));
        return Err(CodecError::Shape(format!("expected an object, got {}", kind_of(&document))));
    };

    let mut set = TranslationSet::new();
    for (key, value) in entries {
        if matches!(value, Value::Object(_) | Value::Array(_)) {
            tracing::warn!("Translation value for '{key}' is nested");
            return Err(CodecError::Shape(format!("nested value under key '{key}'")));
        }
        set.insert(Locale::new(&key), value);
    }
    Ok(set)
}

/// Encode a [`TranslationSet`] into column text.
///
/// Keys are written in sorted order, so equal sets encode to equal text
/// and `decode(encode(set))` reproduces `set`.
#[must_use]
pub fn encode(set: &TranslationSet) -> String {
    set.to_value().to_string()
}

/// Human-readable JSON value kind for error messages.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
