//! Free-text normalization for matching.
//!
//! Chat input arrives with invisible direction marks, niqqud, fancy quotes
//! and emphasis spam ("כןןןן"). Everything that compares user text against
//! keywords, aliases or catalog names goes through [`normalize_for_match`]
//! first so that all of those variants collapse to one canonical form.

use unicode_normalization::UnicodeNormalization;

// Zero-width and bidi controls commonly seen in chat apps
const ZERO_WIDTH: [char; 4] = ['\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'];
const BIDI: [char; 11] = [
    '\u{200e}', '\u{200f}', '\u{202a}', '\u{202b}', '\u{202c}', '\u{202d}', '\u{202e}',
    '\u{2066}', '\u{2067}', '\u{2068}', '\u{2069}',
];

// Hebrew niqqud (combining marks) range
const NIQQUD_START: char = '\u{0591}';
const NIQQUD_END: char = '\u{05C7}';

// Common dash and quote variants (dashes include the Hebrew maqaf, quotes
// include geresh/gershayim)
const DASHES: [char; 8] = [
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2015}', '\u{2212}',
    '\u{05be}',
];
const QUOTES: [char; 10] = [
    '\u{2018}', '\u{2019}', '\u{201a}', '\u{201b}', '\u{201c}', '\u{201d}', '\u{201e}',
    '\u{201f}', '\u{05f3}', '\u{05f4}',
];

fn is_niqqud(ch: char) -> bool {
    (NIQQUD_START..=NIQQUD_END).contains(&ch)
}

fn is_hebrew_letter(ch: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&ch)
}

fn is_match_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || is_hebrew_letter(ch)
}

/// Removes Hebrew combining diacritics (niqqud and cantillation marks).
pub fn strip_niqqud(value: &str) -> String {
    value.chars().filter(|ch| !is_niqqud(*ch)).collect()
}

// Collapse runs of 3+ identical Hebrew/Latin letters down to 2. The regex
// crate has no backreferences, so this is a plain scan.
fn collapse_repeated_letters(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for ch in value.chars() {
        if Some(ch) == prev && is_match_letter(ch) {
            run += 1;
        } else {
            prev = Some(ch);
            run = 1;
        }
        if run <= 2 {
            out.push(ch);
        }
    }
    out
}

/// Normalizes free-form user text for robust matching.
///
/// Intended for keyword/category comparisons and fuzzy matching of short
/// fields. Not for numeric parsing.
///
/// Applied in order: NFC composition; removal of zero-width/bidi controls;
/// niqqud stripping; quote/dash canonicalization; case folding; repeated
/// letter collapse; stripping everything outside letters/digits/space/hyphen;
/// whitespace collapse.
pub fn normalize_for_match(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let composed: String = value.nfc().collect();
    let mut cleaned = String::with_capacity(composed.len());
    for ch in composed.chars() {
        if ZERO_WIDTH.contains(&ch) || BIDI.contains(&ch) || is_niqqud(ch) {
            continue;
        }
        if QUOTES.contains(&ch) {
            cleaned.push('\'');
        } else if DASHES.contains(&ch) {
            cleaned.push('-');
        } else {
            cleaned.push(ch);
        }
    }
    let lowered = cleaned.to_lowercase();
    let collapsed = collapse_repeated_letters(&lowered);
    let filtered: String = collapsed
        .chars()
        .filter(|ch| {
            is_match_letter(*ch) || ch.is_ascii_digit() || *ch == '-' || ch.is_whitespace()
        })
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Hebrew letters proper (including finals), excluding the block's
// punctuation and marks, so "ק\"ג" and "ק״ג" produce the same token
fn is_hebrew_token_letter(ch: char) -> bool {
    ('\u{05d0}'..='\u{05ea}').contains(&ch)
}

/// Reduces text to a single comparison token: Latin/Hebrew letters and
/// digits only, lowercased. Shared by unit alias resolution and store
/// search-term derivation.
pub fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || is_hebrew_token_letter(*ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_invisible_controls() {
        assert_eq!(normalize_for_match("\u{200f}שלום\u{200e}"), "שלום");
        assert_eq!(normalize_for_match("he\u{200b}llo"), "hello");
    }

    #[test]
    fn test_strips_niqqud() {
        assert_eq!(normalize_for_match("שָׁלוֹם"), "שלום");
    }

    #[test]
    fn test_canonicalizes_quotes_and_dashes() {
        // gershayim inside an abbreviation becomes an ASCII quote which is
        // then dropped by the allowed-character filter
        assert_eq!(normalize_for_match("ק\u{05f4}ג"), "קג");
        assert_eq!(normalize_for_match("tel\u{2013}aviv"), "tel-aviv");
    }

    #[test]
    fn test_collapses_repeated_letters() {
        assert_eq!(normalize_for_match("כןןןן"), "כןן");
        assert_eq!(normalize_for_match("yesssss"), "yess");
        // digits are untouched
        assert_eq!(normalize_for_match("1000"), "1000");
    }

    #[test]
    fn test_case_folds_and_collapses_whitespace() {
        assert_eq!(normalize_for_match("  Tel    AVIV "), "tel aviv");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(normalize_for_match("milk, 3% (1L)!"), "milk 3 1l");
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("ק\"ג"), "קג");
        assert_eq!(normalize_token(" Liter "), "liter");
        assert_eq!(normalize_token("מ״ל"), "מל");
    }
}
