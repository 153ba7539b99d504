//! User-facing string translation.
//!
//! All prompts and errors are keyed strings resolved through a [`Translator`]
//! at reply-build time; [`StaticTranslator`] is the built-in catalog and the
//! seam for swapping in an external string table.

mod catalog;
mod keys;

pub use catalog::StaticTranslator;
pub use keys::MessageKey;

use crate::locale::Locale;

/// Template parameters: `(placeholder, value)` pairs substituted into
/// `{placeholder}` markers.
pub type Params<'a> = &'a [(&'static str, String)];

/// Resolves a message key to display text for a locale.
pub trait Translator: Send + Sync {
    fn translate(&self, key: MessageKey, locale: Locale, params: Params<'_>) -> String;

    /// Convenience for parameterless keys.
    fn plain(&self, key: MessageKey, locale: Locale) -> String {
        self.translate(key, locale, &[])
    }
}
