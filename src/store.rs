//! Read and write operations against one attribute's backing column.

use serde_json::Value;

use crate::codec::{
    self,
    CodecError,
    TranslationSet,
};
use crate::context::I18nContext;
use crate::fallback;
use crate::locale::Locale;

/// Suffix appended to an attribute name to form its column name.
pub const TRANSLATION_COLUMN_SUFFIX: &str = "_translations";

/// The backing column name for `attribute` (`title` → `title_translations`).
#[must_use]
pub fn translation_column(attribute: &str) -> String {
    format!("{attribute}{TRANSLATION_COLUMN_SUFFIX}")
}

/// Backing-column contract a host entity exposes to the store.
///
/// The host owns persistence and change tracking; the store only reads
/// and writes the in-memory column text, announcing a change before it
/// happens.
pub trait TranslationBacking {
    /// Current text of `column`, if set.
    fn read_column(&self, column: &str) -> Option<&str>;

    /// Replace the text of `column`.
    fn write_column(&mut self, column: &str, raw: String);

    /// Invoked once before a value-changing write to `column`, so the
    /// host can register it as modified.
    fn column_will_change(&mut self, column: &str);
}

/// Orchestrates codec, fallback resolution, and the backing column for
/// one host entity.
///
/// Stateless apart from the borrowed context: every operation re-decodes
/// the current column text, so readers always see the latest write.
#[derive(Debug, Clone, Copy)]
pub struct TranslationStore<'a> {
    /// Injected ambient-locale and fallback-chain collaborators.
    ctx: &'a I18nContext,
}

impl<'a> TranslationStore<'a> {
    /// A store operating under `ctx`.
    #[must_use]
    pub const fn new(ctx: &'a I18nContext) -> Self {
        Self { ctx }
    }

    /// Every stored translation for `attribute`.
    ///
    /// An absent or empty column yields the empty set.
    pub fn read_all<H: TranslationBacking>(
        &self,
        host: &H,
        attribute: &str,
    ) -> Result<TranslationSet, CodecError> {
        codec::decode(host.read_column(&translation_column(attribute)))
    }

    /// The stored value for `locale` (default: the ambient locale).
    ///
    /// Candidate locales come from the fallback resolver; the first one
    /// holding a present, non-empty value wins. `None` when no candidate
    /// matches.
    pub fn read_one<H: TranslationBacking>(
        &self,
        host: &H,
        attribute: &str,
        locale: Option<&Locale>,
        fallback_enabled: bool,
    ) -> Result<Option<Value>, CodecError> {
        let translations = self.read_all(host, attribute)?;
        let locale = self.requested_locale(locale);
        let candidates = fallback::resolve(&locale, fallback_enabled, self.ctx.fallbacks());
        tracing::debug!("Reading '{attribute}' at {locale}, candidates: {candidates:?}");

        Ok(candidates
            .iter()
            .find_map(|candidate| translations.get(candidate).filter(|value| codec::is_present(value)))
            .cloned())
    }

    /// Store `value` under `locale` (default: the ambient locale) and
    /// return it.
    ///
    /// The host's change hook fires at most once, before the mapping is
    /// mutated, and only when the stored value actually changes; the
    /// column text is re-encoded and assigned on every call.
    pub fn write_one<H: TranslationBacking>(
        &self,
        host: &mut H,
        attribute: &str,
        locale: Option<&Locale>,
        value: Value,
    ) -> Result<Value, CodecError> {
        let column = translation_column(attribute);
        let mut translations = codec::decode(host.read_column(&column))?;
        let locale = self.requested_locale(locale);

        if translations.get(&locale) != Some(&value) {
            tracing::debug!("Column '{column}' changing at {locale}");
            host.column_will_change(&column);
        }
        translations.insert(locale, value.clone());
        host.write_column(&column, codec::encode(&translations));
        Ok(value)
    }

    /// The explicitly requested locale, or the context's ambient one.
    fn requested_locale(&self, locale: Option<&Locale>) -> Locale {
        locale.cloned().unwrap_or_else(|| self.ctx.current_locale())
    }
}
