//! i18n-attrs
//!
//! Per-locale attribute translations stored in a single JSON column.
//!
//! A host record type declares a set of translatable attributes and
//! stores one flat JSON object per attribute in a
//! `<attribute>_translations` text column. Callers reach the per-locale
//! values through synthetic accessor names (`title_en`, `title_en=`,
//! `title_all`) resolved at call time, with locale fallback on reads and
//! change notification on writes. Persistence of the column itself is
//! the host's business; this crate only reads and writes its in-memory
//! value through the [`store::TranslationBacking`] contract.

pub mod accessor;
pub mod codec;
pub mod context;
pub mod entity;
pub mod fallback;
pub mod locale;
pub mod store;

mod test_utils;

pub use accessor::{
    AccessorRequest,
    AttributeSet,
};
pub use codec::{
    CodecError,
    TranslationSet,
};
pub use context::I18nContext;
pub use entity::{
    DispatchError,
    Translatable,
};
pub use fallback::{
    FallbackChain,
    FallbackState,
    StaticFallbacks,
};
pub use locale::{
    Locale,
    LocaleProvider,
    StaticLocale,
};
pub use store::{
    TranslationBacking,
    TranslationStore,
};
