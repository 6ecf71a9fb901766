//! Locale fallback resolution for the read path.

use std::collections::HashMap;

use crate::locale::Locale;

/// External collaborator that knows each locale's fallback chain.
pub trait FallbackChain {
    /// Ordered candidate locales for `locale`, closest match first.
    ///
    /// The chain is expected to lead with `locale` itself; it is consumed
    /// as-is, without reordering or deduplication.
    fn chain_for(&self, locale: &Locale) -> Vec<Locale>;
}

/// A fixed, table-driven fallback chain.
#[derive(Debug, Clone, Default)]
pub struct StaticFallbacks {
    /// Locale → its configured chain.
    chains: HashMap<Locale, Vec<Locale>>,
}

impl StaticFallbacks {
    /// An empty table: every locale falls back to itself only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the chain consulted for `locale`.
    #[must_use]
    pub fn with_chain(mut self, locale: &str, chain: &[&str]) -> Self {
        self.chains
            .insert(Locale::new(locale), chain.iter().map(|code| Locale::new(code)).collect());
        self
    }
}

impl FallbackChain for StaticFallbacks {
    fn chain_for(&self, locale: &Locale) -> Vec<Locale> {
        self.chains.get(locale).cloned().unwrap_or_else(|| vec![locale.clone()])
    }
}

/// Per-instance fallback toggle. Enabled unless explicitly disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackState {
    /// Whether reads may consult the fallback chain.
    enabled: bool,
}

impl Default for FallbackState {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FallbackState {
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replace the flag, returning the prior value.
    pub const fn replace(&mut self, enabled: bool) -> bool {
        let prior = self.enabled;
        self.enabled = enabled;
        prior
    }
}

/// Ordered locales to consult for one read.
///
/// With fallback disabled, or no chain service configured, only the
/// requested locale is consulted; otherwise the service's chain is
/// returned unchanged.
#[must_use]
pub fn resolve(
    locale: &Locale,
    fallback_enabled: bool,
    chain: Option<&dyn FallbackChain>,
) -> Vec<Locale> {
    match chain {
        Some(chain) if fallback_enabled => chain.chain_for(locale),
        _ => vec![locale.clone()],
    }
}
