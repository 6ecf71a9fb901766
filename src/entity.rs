//! The capability surface a host record type opts into.

use serde_json::Value;
use thiserror::Error;

use crate::accessor::{
    AccessorRequest,
    AttributeSet,
};
use crate::codec::{
    CodecError,
    TranslationSet,
};
use crate::context::I18nContext;
use crate::fallback::FallbackState;
use crate::locale::Locale;
use crate::store::{
    TranslationBacking,
    TranslationStore,
};

/// Raised when a symbolic call cannot be completed.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The name matches neither accessor form; the host's own member
    /// resolution has the last word.
    #[error("Unknown member `{0}`")]
    UnknownMember(String),
    /// The backing column could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Capability trait giving a host entity type translatable attributes.
///
/// A host declares its attribute set once, stores a [`FallbackState`]
/// per instance, and exposes its backing columns through
/// [`TranslationBacking`]; the provided methods supply the synthetic
/// accessor dispatch, the capability query, fallback toggling, and a
/// typed convenience surface.
pub trait Translatable: TranslationBacking {
    /// The attribute names this type declared translatable.
    ///
    /// Fixed after declaration and shared read-only by every instance.
    fn translatable_attributes() -> &'static AttributeSet
    where
        Self: Sized;

    /// This instance's fallback flag.
    fn fallback_state(&self) -> &FallbackState;

    /// Mutable access for the toggle operations below.
    fn fallback_state_mut(&mut self) -> &mut FallbackState;

    /// Whether reads may consult the fallback chain.
    #[must_use]
    fn fallback_enabled(&self) -> bool {
        self.fallback_state().enabled()
    }

    /// Let reads consult the fallback chain until toggled again.
    fn enable_fallback(&mut self) {
        self.fallback_state_mut().set(true);
    }

    /// Restrict reads to the exact requested locale until toggled again.
    fn disable_fallback(&mut self) {
        self.fallback_state_mut().set(false);
    }

    /// Run `f` with the fallback flag forced to `enabled`, restoring the
    /// prior value on every exit path, panics included.
    ///
    /// Nested scopes restore the immediately-enclosing value, not a
    /// global default.
    fn with_fallback<R>(&mut self, enabled: bool, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        let prior = self.fallback_state_mut().replace(enabled);
        let scope = FallbackScope { host: self, prior };
        f(&mut *scope.host)
    }

    /// Whether `name` is one of this type's synthetic accessors.
    ///
    /// Agrees exactly with [`Translatable::dispatch`]: both the
    /// attribute-locale form and the "all" form count, so introspection
    /// and dispatch present one coherent surface.
    #[must_use]
    fn responds_to(&self, name: &str) -> bool
    where
        Self: Sized,
    {
        AccessorRequest::parse(name, Self::translatable_attributes()).is_some()
    }

    /// Resolve and execute the symbolic call `name`.
    ///
    /// Write names consume `arg` (a missing argument writes `null`);
    /// read names ignore it. A read with no stored translation yields
    /// `null`. Unrecognized names fail with
    /// [`DispatchError::UnknownMember`], never a silent swallow.
    fn dispatch(
        &mut self,
        ctx: &I18nContext,
        name: &str,
        arg: Option<Value>,
    ) -> Result<Value, DispatchError>
    where
        Self: Sized,
    {
        let Some(request) = AccessorRequest::parse(name, Self::translatable_attributes()) else {
            return Err(DispatchError::UnknownMember(name.to_string()));
        };
        tracing::debug!("Dispatching accessor '{name}'");

        let store = TranslationStore::new(ctx);
        if request.all {
            return Ok(store.read_all(self, &request.attribute)?.to_value());
        }
        if request.is_write {
            let value = arg.unwrap_or(Value::Null);
            return Ok(store.write_one(self, &request.attribute, request.locale.as_ref(), value)?);
        }
        let found = store.read_one(
            self,
            &request.attribute,
            request.locale.as_ref(),
            self.fallback_enabled(),
        )?;
        Ok(found.unwrap_or(Value::Null))
    }

    /// Every stored translation for `attribute`.
    fn translations(
        &self,
        ctx: &I18nContext,
        attribute: &str,
    ) -> Result<TranslationSet, CodecError>
    where
        Self: Sized,
    {
        TranslationStore::new(ctx).read_all(self, attribute)
    }

    /// The translation for `locale` (default: the ambient locale),
    /// honoring this instance's fallback flag.
    fn translation(
        &self,
        ctx: &I18nContext,
        attribute: &str,
        locale: Option<&Locale>,
    ) -> Result<Option<Value>, CodecError>
    where
        Self: Sized,
    {
        TranslationStore::new(ctx).read_one(self, attribute, locale, self.fallback_enabled())
    }

    /// Store `value` for `attribute` under `locale` (default: the
    /// ambient locale).
    fn set_translation(
        &mut self,
        ctx: &I18nContext,
        attribute: &str,
        locale: Option<&Locale>,
        value: Value,
    ) -> Result<Value, CodecError>
    where
        Self: Sized,
    {
        TranslationStore::new(ctx).write_one(self, attribute, locale, value)
    }
}

/// Restores a host's fallback flag when dropped, so a scoped override
/// cannot leak past a panic.
struct FallbackScope<'a, T: Translatable> {
    /// The host whose flag is restored.
    host: &'a mut T,
    /// The flag value to restore.
    prior: bool,
}

impl<T: Translatable> Drop for FallbackScope<'_, T> {
    fn drop(&mut self) {
        self.host.fallback_state_mut().set(self.prior);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{
        Article,
        canadian_context,
        english_context,
    };

    #[googletest::test]
    fn dispatch_write_then_read_round_trips() {
        let ctx = english_context();
        let mut article = Article::default();

        let written = article.dispatch(&ctx, "title_en=", Some(json!("Hello"))).unwrap();
        let read = article.dispatch(&ctx, "title_en", None).unwrap();

        expect_that!(written, eq(&json!("Hello")));
        expect_that!(read, eq(&json!("Hello")));
    }

    #[googletest::test]
    fn dispatch_read_of_missing_translation_is_null() {
        let ctx = english_context();
        let mut article = Article::default();

        let read = article.dispatch(&ctx, "title_en", None).unwrap();

        expect_that!(read, eq(&Value::Null));
    }

    #[googletest::test]
    fn dispatch_write_without_argument_stores_null() {
        let ctx = english_context();
        let mut article = Article::default();

        let written = article.dispatch(&ctx, "title_en=", None).unwrap();

        expect_that!(written, eq(&Value::Null));
        expect_that!(article.column("title_translations"), some(eq(r#"{"en":null}"#)));
    }

    #[googletest::test]
    fn dispatch_all_returns_every_stored_translation() {
        let ctx = english_context();
        let mut article = Article::default();
        article.dispatch(&ctx, "title_en=", Some(json!("Hello"))).unwrap();
        article.dispatch(&ctx, "title_fr=", Some(json!("Bonjour"))).unwrap();

        let all = article.dispatch(&ctx, "title_all", None).unwrap();

        expect_that!(all, eq(&json!({"en": "Hello", "fr": "Bonjour"})));
    }

    #[rstest]
    #[case::unrelated("save")]
    #[case::unregistered_attribute("author_en")]
    #[case::unregistered_all("author_all")]
    #[case::bad_locale_segment("title_eng")]
    fn dispatch_declines_foreign_names(#[case] name: &str) {
        let ctx = english_context();
        let mut article = Article::default();

        let result = article.dispatch(&ctx, name, None);

        assert!(matches!(result, Err(DispatchError::UnknownMember(_))));
    }

    #[googletest::test]
    fn dispatch_surfaces_codec_errors() {
        let ctx = english_context();
        let mut article = Article::default().with_column("title_translations", "{corrupt");

        let result = article.dispatch(&ctx, "title_en", None);

        expect_that!(matches!(result, Err(DispatchError::Codec(_))), eq(true));
    }

    #[rstest]
    #[case::read("title_en", true)]
    #[case::write("title_en=", true)]
    #[case::all("title_all", true)]
    #[case::lenient_all("title_alls", true)]
    #[case::second_attribute("body_ja", true)]
    #[case::unregistered("author_en", false)]
    #[case::unrelated("save", false)]
    fn responds_to_agrees_with_dispatch(#[case] name: &str, #[case] expected: bool) {
        let ctx = english_context();
        let mut article = Article::default();

        assert_eq!(article.responds_to(name), expected);
        let dispatched = article.dispatch(&ctx, name, Some(json!("x")));
        assert_eq!(!matches!(dispatched, Err(DispatchError::UnknownMember(_))), expected);
    }

    #[googletest::test]
    fn fallback_toggles_persist_until_changed() {
        let mut article = Article::default();

        expect_that!(article.fallback_enabled(), eq(true));
        article.disable_fallback();
        expect_that!(article.fallback_enabled(), eq(false));
        article.enable_fallback();
        expect_that!(article.fallback_enabled(), eq(true));
    }

    #[googletest::test]
    fn dispatch_read_honors_fallback_state() {
        let ctx = canadian_context();
        let mut article =
            Article::default().with_column("title_translations", r#"{"en":"Hello","fr":"Bonjour"}"#);

        let with_fallback = article.dispatch(&ctx, "title_fr", None).unwrap();
        article.disable_fallback();
        let without_fallback = article.dispatch(&ctx, "title_fr", None).unwrap();

        expect_that!(with_fallback, eq(&json!("Bonjour")));
        // fr has an exact value, so disabling changes nothing here
        expect_that!(without_fallback, eq(&json!("Bonjour")));
    }

    #[googletest::test]
    fn with_fallback_restores_on_normal_return() {
        let ctx = canadian_context();
        let mut article =
            Article::default().with_column("title_translations", r#"{"fr":"Bonjour"}"#);

        let inside = article
            .with_fallback(false, |host| host.translation(&ctx, "title", None).unwrap());

        expect_that!(inside, none());
        expect_that!(article.fallback_enabled(), eq(true));
    }

    #[googletest::test]
    fn with_fallback_nested_scopes_restore_enclosing_value() {
        let mut article = Article::default();

        article.with_fallback(false, |host| {
            host.with_fallback(true, |inner| {
                expect_that!(inner.fallback_enabled(), eq(true));
            });
            expect_that!(host.fallback_enabled(), eq(false));
        });

        expect_that!(article.fallback_enabled(), eq(true));
    }

    #[googletest::test]
    #[allow(clippy::panic)]
    fn with_fallback_restores_across_panic() {
        let mut article = Article::default();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            article.with_fallback(false, |_| panic!("boom"));
        }));

        expect_that!(result.is_err(), eq(true));
        expect_that!(article.fallback_enabled(), eq(true));
    }

    #[googletest::test]
    fn typed_surface_round_trips() {
        let ctx = english_context();
        let mut article = Article::default();

        article.set_translation(&ctx, "title", Some(&Locale::new("fr")), json!("Bonjour")).unwrap();

        let one = article.translation(&ctx, "title", Some(&Locale::new("fr"))).unwrap();
        let all = article.translations(&ctx, "title").unwrap();

        expect_that!(one, some(eq(&json!("Bonjour"))));
        expect_that!(all.len(), eq(1));
    }
}
