//! The injected collaborators every translation operation consults.

use std::fmt;

use crate::fallback::FallbackChain;
use crate::locale::{
    Locale,
    LocaleProvider,
};

/// Ambient collaborators for translation reads and writes: the
/// current-locale source, and the locale-fallback chain service when one
/// is configured.
///
/// Callers hand a context to each operation instead of the core reading
/// process-wide state; tests inject fixed implementations.
pub struct I18nContext {
    /// Supplies the locale when a caller passes none.
    locale_provider: Box<dyn LocaleProvider>,
    /// The fallback chain service; absence means identity fallback.
    fallbacks: Option<Box<dyn FallbackChain>>,
}

impl I18nContext {
    /// Create a context with `locale_provider` and no fallback chain.
    #[must_use]
    pub fn new(locale_provider: impl LocaleProvider + 'static) -> Self {
        Self { locale_provider: Box::new(locale_provider), fallbacks: None }
    }

    /// Configure the fallback chain service.
    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: impl FallbackChain + 'static) -> Self {
        self.fallbacks = Some(Box::new(fallbacks));
        self
    }

    /// The locale in effect when a caller does not pass one.
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.locale_provider.current_locale()
    }

    /// The configured fallback chain service, if any.
    #[must_use]
    pub fn fallbacks(&self) -> Option<&dyn FallbackChain> {
        self.fallbacks.as_deref()
    }
}

impl fmt::Debug for I18nContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18nContext")
            .field("current_locale", &self.current_locale())
            .field("has_fallbacks", &self.fallbacks.is_some())
            .finish()
    }
}
