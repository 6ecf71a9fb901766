//! Shared test fixtures.
//!
//! A minimal host entity and ready-made contexts used across the unit
//! test modules.
#![cfg(test)]

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::accessor::AttributeSet;
use crate::context::I18nContext;
use crate::entity::Translatable;
use crate::fallback::{
    FallbackState,
    StaticFallbacks,
};
use crate::locale::StaticLocale;
use crate::store::TranslationBacking;

/// The attributes the test host declares translatable.
static ARTICLE_ATTRIBUTES: LazyLock<AttributeSet> =
    LazyLock::new(|| AttributeSet::new(["title", "body"]));

/// A host entity standing in for a persisted record: columns in a map,
/// change notifications logged on the side.
#[derive(Debug, Default)]
pub(crate) struct Article {
    /// Column name → column text.
    columns: HashMap<String, String>,
    /// Column names announced through the change hook, in call order.
    pub(crate) changes: Vec<String>,
    /// Per-instance fallback flag.
    fallback: FallbackState,
}

impl Article {
    /// Seed a column with raw text, bypassing the write path.
    pub(crate) fn with_column(mut self, column: &str, raw: &str) -> Self {
        self.columns.insert(column.to_string(), raw.to_string());
        self
    }

    /// The current raw text of `column`.
    pub(crate) fn column(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}

impl TranslationBacking for Article {
    fn read_column(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    fn write_column(&mut self, column: &str, raw: String) {
        self.columns.insert(column.to_string(), raw);
    }

    fn column_will_change(&mut self, column: &str) {
        self.changes.push(column.to_string());
    }
}

impl Translatable for Article {
    fn translatable_attributes() -> &'static AttributeSet {
        &ARTICLE_ATTRIBUTES
    }

    fn fallback_state(&self) -> &FallbackState {
        &self.fallback
    }

    fn fallback_state_mut(&mut self) -> &mut FallbackState {
        &mut self.fallback
    }
}

/// A context fixed to `en` with no fallback chain configured.
pub(crate) fn english_context() -> I18nContext {
    I18nContext::new(StaticLocale::new("en"))
}

/// A context fixed to `fr-CA` with the chain `fr-CA → [fr-CA, fr, en]`.
pub(crate) fn canadian_context() -> I18nContext {
    I18nContext::new(StaticLocale::new("fr-CA"))
        .with_fallbacks(StaticFallbacks::new().with_chain("fr-CA", &["fr-CA", "fr", "en"]))
}
