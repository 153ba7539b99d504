//! Chat user domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// A chat user.
///
/// Identity comes from the transport layer (an opaque sender id); the core
/// only keeps the profile bits the conversation needs: locale and the saved
/// default city used to pre-fill the city question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    pub locale: Locale,
    /// Saved default city, when it resolved to a catalog record.
    #[serde(default)]
    pub city_id: Option<String>,
    /// Free-text saved city fallbacks, per script.
    #[serde(default)]
    pub city_he: String,
    #[serde(default)]
    pub city_en: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new user with the given id and locale.
    pub fn new(id: impl Into<String>, locale: Locale) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            locale,
            city_id: None,
            city_he: String::new(),
            city_en: String::new(),
            created_at: Utc::now(),
            last_seen: None,
        }
    }

    /// True when the user has any saved default city.
    pub fn has_saved_city(&self) -> bool {
        self.city_id.is_some() || !self.city_he.is_empty() || !self.city_en.is_empty()
    }

    /// The saved city's display text for the user's locale.
    pub fn saved_city_display(&self) -> &str {
        match self.locale {
            Locale::He if !self.city_he.is_empty() => &self.city_he,
            _ if !self.city_en.is_empty() => &self.city_en,
            _ => &self.city_he,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_city_display_prefers_locale() {
        let mut user = User::new("u-1", Locale::He);
        user.city_he = "תל אביב".to_string();
        user.city_en = "Tel Aviv".to_string();
        assert_eq!(user.saved_city_display(), "תל אביב");
        user.locale = Locale::En;
        assert_eq!(user.saved_city_display(), "Tel Aviv");
    }

    #[test]
    fn test_has_saved_city() {
        let mut user = User::new("u-1", Locale::En);
        assert!(!user.has_saved_city());
        user.city_en = "Haifa".to_string();
        assert!(user.has_saved_city());
    }
}
