//! City domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::normalize_for_match;

/// A canonical bilingual place name.
///
/// Uniquely identified by `slug`. Either language name may be blank; saving
/// backfills the missing one from the other so both are always usable for
/// matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name_he: String,
    pub name_en: String,
    pub slug: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    /// Creates a new city, backfilling the missing bilingual name.
    pub fn new(
        name_he: impl Into<String>,
        name_en: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let mut city = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name_he: name_he.into(),
            name_en: name_en.into(),
            slug: slug.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        city.backfill_names();
        city
    }

    /// Copies a missing bilingual name from its counterpart.
    pub fn backfill_names(&mut self) {
        if self.name_he.is_empty() {
            self.name_he = self.name_en.clone();
        }
        if self.name_en.is_empty() {
            self.name_en = self.name_he.clone();
        }
    }

    /// Display name: English first, Hebrew fallback.
    pub fn display_name(&self) -> &str {
        if self.name_en.is_empty() {
            &self.name_he
        } else {
            &self.name_en
        }
    }

    /// True if either bilingual name equals the query, case-insensitively.
    pub fn matches_name(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        self.name_he.to_lowercase() == q || self.name_en.to_lowercase() == q
    }
}

/// Derives a url-ish slug from a city name (Unicode letters kept, spaces
/// become hyphens). Uniqueness is the caller's concern.
pub fn slugify(name: &str) -> String {
    let base = normalize_for_match(name).replace(' ', "-");
    if base.is_empty() {
        "city".to_string()
    } else {
        base
    }
}
