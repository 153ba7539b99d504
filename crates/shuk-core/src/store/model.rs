//! Store domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::text::normalize_token;

/// A physical store (branch or standalone location).
///
/// Cities are referenced two ways: `city_id` when the city resolved to a
/// catalog record, plus free-text `city*` fallbacks captured before city
/// records existed. Alias lists feed the derived `search_terms` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub city_id: Option<String>,
    /// Free-text city as the reporter typed it.
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub city_he: String,
    #[serde(default)]
    pub city_en: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub aliases_he: Vec<String>,
    #[serde(default)]
    pub aliases_en: Vec<String>,
    /// Normalized tokens of name/display name/aliases.
    ///
    /// Always re-derived from the fields above on every save; never set
    /// independently.
    #[serde(default)]
    pub search_terms: BTreeSet<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// Creates a new store with the given name; `display_name` defaults to
    /// the name and the search terms are derived immediately.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        let mut store = Self {
            id: uuid::Uuid::new_v4().to_string(),
            display_name: name.clone(),
            name,
            city_id: None,
            city: String::new(),
            city_he: String::new(),
            city_en: String::new(),
            address: String::new(),
            aliases_he: Vec::new(),
            aliases_en: Vec::new(),
            search_terms: BTreeSet::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        store.refresh_search_terms();
        store
    }

    /// Re-derives `search_terms` from name, display name and alias lists.
    ///
    /// Must run on every mutation of those fields; repository
    /// implementations call it before persisting.
    pub fn refresh_search_terms(&mut self) {
        let mut terms = BTreeSet::new();
        let sources = [self.name.as_str(), self.display_name.as_str()]
            .into_iter()
            .chain(self.aliases_he.iter().map(String::as_str))
            .chain(self.aliases_en.iter().map(String::as_str));
        for source in sources {
            let token = normalize_token(source);
            if !token.is_empty() {
                terms.insert(token);
            }
        }
        self.search_terms = terms;
    }

    /// Branch-facing label for candidate lists.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// Secondary detail line for candidate lists (address, else city text).
    pub fn detail(&self) -> &str {
        if !self.address.is_empty() {
            &self.address
        } else if !self.city.is_empty() {
            &self.city
        } else if !self.city_en.is_empty() {
            &self.city_en
        } else {
            &self.city_he
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms_derived_from_aliases() {
        let mut store = Store::new("שופרסל");
        store.aliases_he = vec!["שוופרסל".to_string()];
        store.aliases_en = vec!["Shufersal".to_string()];
        store.refresh_search_terms();
        assert!(store.search_terms.contains("שופרסל"));
        assert!(store.search_terms.contains("שוופרסל"));
        assert!(store.search_terms.contains("shufersal"));
    }

    #[test]
    fn test_refresh_replaces_stale_terms() {
        let mut store = Store::new("Mega");
        assert!(store.search_terms.contains("mega"));
        store.name = "Carrefour".to_string();
        store.display_name = "Carrefour".to_string();
        store.refresh_search_terms();
        assert!(!store.search_terms.contains("mega"));
        assert!(store.search_terms.contains("carrefour"));
    }

    #[test]
    fn test_detail_falls_back_to_city() {
        let mut store = Store::new("Mega");
        assert_eq!(store.detail(), "");
        store.city_en = "Holon".to_string();
        assert_eq!(store.detail(), "Holon");
        store.address = "12 Main St".to_string();
        assert_eq!(store.detail(), "12 Main St");
    }
}
