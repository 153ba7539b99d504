//! Canonical unit-of-measure catalog.
//!
//! Users describe package units in either script with plenty of
//! abbreviations ("kg", "ק\"ג", "קילו"). The catalog maps all of those to a
//! small set of canonical units with bilingual labels. Unrecognized input
//! degrades to free text instead of failing.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::locale::{Locale, contains_hebrew};
use crate::text::normalize_token;

/// A canonical unit with bilingual labels and its accepted spellings.
pub struct UnitEntry {
    pub slug: &'static str,
    pub en: &'static str,
    pub he: &'static str,
    pub aliases: &'static [&'static str],
}

/// The canonical unit registry. Immutable; alias lookup is indexed once.
pub static UNIT_CANONICALS: &[UnitEntry] = &[
    UnitEntry {
        slug: "liter",
        en: "Liter",
        he: "ליטר",
        aliases: &["liter", "litre", "ltr", "l", "ליטר", "ליט'", "ל'"],
    },
    UnitEntry {
        slug: "milliliter",
        en: "Milliliter",
        he: "מיליליטר",
        aliases: &["milliliter", "millilitre", "ml", "מיליליטר", "מ״ל", "מל"],
    },
    UnitEntry {
        slug: "kilogram",
        en: "Kilogram",
        he: "קילוגרם",
        aliases: &["kilogram", "kg", "kilo", "ק\"ג", "קג", "קילו", "קילוגרם"],
    },
    UnitEntry {
        slug: "gram",
        en: "Gram",
        he: "גרם",
        aliases: &["gram", "gr", "g", "גרם", "ג'", "גר"],
    },
    UnitEntry {
        slug: "unit",
        en: "Unit",
        he: "יחידה",
        aliases: &["unit", "piece", "pcs", "יחידה", "יח'", "יחידות"],
    },
    UnitEntry {
        slug: "pack",
        en: "Pack",
        he: "חבילה",
        aliases: &["pack", "package", "pkg", "חבילה", "חב'", "חב"],
    },
    UnitEntry {
        slug: "bottle",
        en: "Bottle",
        he: "בקבוק",
        aliases: &["bottle", "btl", "בקבוק"],
    },
    UnitEntry {
        slug: "can",
        en: "Can",
        he: "פחית",
        aliases: &["can", "פחית"],
    },
    UnitEntry {
        slug: "bag",
        en: "Bag",
        he: "שקית",
        aliases: &["bag", "sack", "שקית", "שק"],
    },
    UnitEntry {
        slug: "tray",
        en: "Tray",
        he: "מגש",
        aliases: &["tray", "מגש"],
    },
    UnitEntry {
        slug: "box",
        en: "Box",
        he: "קופסה",
        aliases: &["box", "קופסה", "קופסא"],
    },
    UnitEntry {
        slug: "jar",
        en: "Jar",
        he: "צנצנת",
        aliases: &["jar", "צנצנת"],
    },
    UnitEntry {
        slug: "tub",
        en: "Tub",
        he: "מיכל",
        aliases: &["tub", "מיכל"],
    },
];

static ALIAS_INDEX: Lazy<HashMap<String, &'static UnitEntry>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for entry in UNIT_CANONICALS {
        for alias in entry.aliases {
            index.insert(normalize_token(alias), entry);
        }
        // canonical labels are accepted spellings too
        index.insert(normalize_token(entry.en), entry);
        index.insert(normalize_token(entry.he), entry);
    }
    index
});

/// The outcome of resolving free unit text.
///
/// `slug` is empty when the input did not match any canonical unit; in that
/// case both labels carry the input through verbatim (title-cased for
/// non-Hebrew script).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResolution {
    pub slug: String,
    pub en: String,
    pub he: String,
}

impl UnitResolution {
    /// True when the input resolved to a canonical unit.
    pub fn is_canonical(&self) -> bool {
        !self.slug.is_empty()
    }

    pub fn label_for(&self, locale: Locale) -> &str {
        match locale {
            Locale::He => &self.he,
            Locale::En => &self.en,
        }
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves free unit text to canonical bilingual labels.
pub fn resolve(raw: &str) -> UnitResolution {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return UnitResolution {
            slug: String::new(),
            en: String::new(),
            he: String::new(),
        };
    }
    if let Some(entry) = ALIAS_INDEX.get(&normalize_token(cleaned)) {
        return UnitResolution {
            slug: entry.slug.to_string(),
            en: entry.en.to_string(),
            he: entry.he.to_string(),
        };
    }
    if contains_hebrew(cleaned) {
        UnitResolution {
            slug: String::new(),
            en: cleaned.to_string(),
            he: cleaned.to_string(),
        }
    } else {
        let capitalized = title_case(cleaned);
        UnitResolution {
            slug: String::new(),
            en: capitalized.clone(),
            he: capitalized,
        }
    }
}

/// Looks up a canonical unit by its slug (tolerant of token noise).
pub fn by_slug(slug: &str) -> Option<&'static UnitEntry> {
    let normalized = normalize_token(slug);
    UNIT_CANONICALS
        .iter()
        .find(|entry| normalize_token(entry.slug) == normalized)
}

/// Maps a `unit_type:<slug>` button id back to display text for a locale.
pub fn label_for_locale(slug: &str, locale: Locale) -> Option<&'static str> {
    by_slug(slug).map(|entry| match locale {
        Locale::He => entry.he,
        Locale::En => entry.en,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilogram_aliases_resolve_identically() {
        for alias in ["kg", "ק\"ג", "קילו", "Kilogram", "קג"] {
            let res = resolve(alias);
            assert_eq!(res.slug, "kilogram", "alias {alias:?}");
            assert_eq!(res.en, "Kilogram");
            assert_eq!(res.he, "קילוגרם");
        }
    }

    #[test]
    fn test_hebrew_abbreviation_with_gershayim() {
        assert_eq!(resolve("מ״ל").slug, "milliliter");
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        let res = resolve("six pack carton");
        assert!(!res.is_canonical());
        assert_eq!(res.en, "Six Pack Carton");
        assert_eq!(res.he, "Six Pack Carton");
    }

    #[test]
    fn test_unknown_hebrew_unit_kept_verbatim() {
        let res = resolve("ארגז");
        assert!(!res.is_canonical());
        assert_eq!(res.he, "ארגז");
        assert_eq!(res.en, "ארגז");
    }

    #[test]
    fn test_label_for_locale() {
        assert_eq!(label_for_locale("liter", Locale::He), Some("ליטר"));
        assert_eq!(label_for_locale("liter", Locale::En), Some("Liter"));
        assert_eq!(label_for_locale("parsec", Locale::En), None);
    }
}
