//! Locale handling for the bilingual (Hebrew/English) conversation surface.
//!
//! The engine only distinguishes two locales. Anything that is not
//! recognizably Hebrew resolves to English, which is also the fallback for
//! unknown locale tags.

use serde::{Deserialize, Serialize};

/// Supported conversation locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Hebrew
    He,
    /// English (default / fallback)
    #[default]
    En,
}

impl Locale {
    /// Normalizes a free-form locale tag (`"he-IL"`, `"hebrew"`, `"עברית"`)
    /// to a supported locale. Unknown tags resolve to English.
    pub fn from_tag(tag: &str) -> Self {
        let s = tag.trim().to_lowercase();
        if s.starts_with("he") || s == "hebrew" || s == "עברית" {
            Locale::He
        } else {
            Locale::En
        }
    }

    /// Returns the short tag for this locale.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::He => "he",
            Locale::En => "en",
        }
    }

    pub fn is_hebrew(&self) -> bool {
        matches!(self, Locale::He)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if the text contains at least one character in the Hebrew
/// Unicode block.
pub fn contains_hebrew(value: &str) -> bool {
    value.chars().any(|ch| ('\u{0590}'..='\u{05FF}').contains(&ch))
}

/// Returns true if the text contains at least one ASCII Latin letter.
pub fn contains_latin(value: &str) -> bool {
    value.chars().any(|ch| ch.is_ascii_alphabetic())
}

/// Script-based locale detection for free text.
///
/// Returns `None` when the text carries no script signal (empty, digits,
/// punctuation), so that numeric replies never flip a stored locale.
pub fn detect(text: &str) -> Option<Locale> {
    let sample = text.trim();
    if sample.is_empty() {
        return None;
    }
    if contains_hebrew(sample) {
        return Some(Locale::He);
    }
    if contains_latin(sample) {
        return Some(Locale::En);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Locale::from_tag("he-IL"), Locale::He);
        assert_eq!(Locale::from_tag("Hebrew"), Locale::He);
        assert_eq!(Locale::from_tag("עברית"), Locale::He);
        assert_eq!(Locale::from_tag("en-US"), Locale::En);
        assert_eq!(Locale::from_tag("fr"), Locale::En);
        assert_eq!(Locale::from_tag(""), Locale::En);
    }

    #[test]
    fn test_detect_scripts() {
        assert_eq!(detect("חלב תנובה"), Some(Locale::He));
        assert_eq!(detect("milk"), Some(Locale::En));
        assert_eq!(detect("4.90"), None);
        assert_eq!(detect("  "), None);
    }

    #[test]
    fn test_mixed_text_prefers_hebrew() {
        assert_eq!(detect("שופרסל branch 12"), Some(Locale::He));
    }
}
