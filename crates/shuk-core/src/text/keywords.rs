//! Semantic keyword registry.
//!
//! Conversation steps never compare raw strings; they ask whether a message
//! means "cancel", "yes", "no", "skip this question" or "change my city" in
//! the user's language. The word sets live here as immutable statics, built
//! once at first use.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::locale::Locale;
use crate::text::normalize::normalize_for_match;

/// Semantic categories a message can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Cancel,
    Yes,
    No,
    Skip,
    CityChange,
}

/// A per-language keyword set: exact (normalized) words plus optional
/// full-match patterns.
pub struct KeywordSet {
    words: &'static [&'static str],
    patterns: Vec<Regex>,
}

impl KeywordSet {
    fn new(words: &'static [&'static str], patterns: &[&str]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid keyword pattern"))
            .collect();
        Self { words, patterns }
    }

    fn matches(&self, normalized: &str) -> bool {
        if self.words.contains(&normalized) {
            return true;
        }
        // patterns are authored anchored (full match)
        self.patterns.iter().any(|p| p.is_match(normalized))
    }
}

struct LocaleSets {
    en: KeywordSet,
    he: KeywordSet,
}

static CANCEL: Lazy<LocaleSets> = Lazy::new(|| LocaleSets {
    en: KeywordSet::new(&["cancel", "stop", "end", "quit"], &[]),
    he: KeywordSet::new(&["בטל", "ביטול", "סיים", "סיום"], &[]),
});

static YES: Lazy<LocaleSets> = Lazy::new(|| LocaleSets {
    en: KeywordSet::new(&["yes", "y", "yeah", "yep", "si"], &[]),
    he: KeywordSet::new(&["כן"], &[]),
});

static NO: Lazy<LocaleSets> = Lazy::new(|| LocaleSets {
    en: KeywordSet::new(&["no", "n", "nope", "not"], &[]),
    he: KeywordSet::new(&["לא", "אין"], &[]),
});

static SKIP: Lazy<LocaleSets> = Lazy::new(|| LocaleSets {
    en: KeywordSet::new(
        &[
            "skip",
            "na",
            "none",
            "unknown",
            "dont know",
            "generic",
            "no brand",
            "no branch",
        ],
        &[],
    ),
    he: KeywordSet::new(
        &[
            "אין",
            "בלי",
            "אין מותג",
            "בלי מותג",
            "אין סניף",
            "בלי סניף",
            "לא יודע",
            "לא ידוע",
        ],
        // skip verb with optional plural suffix
        &["^דלג(ו)?$"],
    ),
});

static CITY_CHANGE: Lazy<LocaleSets> = Lazy::new(|| LocaleSets {
    en: KeywordSet::new(&["change city", "change", "other city"], &[]),
    he: KeywordSet::new(&["שנה עיר", "שנו עיר", "עיר אחרת", "שינוי עיר"], &[]),
});

fn sets_for(category: KeywordCategory) -> &'static LocaleSets {
    match category {
        KeywordCategory::Cancel => &CANCEL,
        KeywordCategory::Yes => &YES,
        KeywordCategory::No => &NO,
        KeywordCategory::Skip => &SKIP,
        KeywordCategory::CityChange => &CITY_CHANGE,
    }
}

/// Matches already-normalized text against a keyword category.
///
/// Use this when the caller has already passed the message through
/// [`normalize_for_match`]. Unknown locales fall back to the English set.
pub fn is_keyword_norm(normalized: &str, category: KeywordCategory, locale: Locale) -> bool {
    let t = normalized.trim();
    if t.is_empty() {
        return false;
    }
    let sets = sets_for(category);
    let set = match locale {
        Locale::He => &sets.he,
        Locale::En => &sets.en,
    };
    set.matches(t)
}

/// Normalizes the given text and matches it against a keyword category.
pub fn is_keyword(text: &str, category: KeywordCategory, locale: Locale) -> bool {
    is_keyword_norm(&normalize_for_match(text), category, locale)
}
