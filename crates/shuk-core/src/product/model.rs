//! Product domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Global product identity (not tied to any single store).
///
/// Bilingual names backfill each other. The default unit fields act as a
/// template: the first report that supplies a unit establishes the default,
/// later reports reuse it unless the reporter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name_he: String,
    pub name_en: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub default_unit_type_he: String,
    #[serde(default)]
    pub default_unit_type_en: String,
    #[serde(default)]
    pub default_unit_quantity: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new product, backfilling the missing bilingual name.
    pub fn new(name_he: impl Into<String>, name_en: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut product = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name_he: name_he.into(),
            name_en: name_en.into(),
            brand: String::new(),
            variant: String::new(),
            default_unit_type_he: String::new(),
            default_unit_type_en: String::new(),
            default_unit_quantity: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        product.backfill_names();
        product
    }

    /// Copies a missing bilingual name from its counterpart.
    pub fn backfill_names(&mut self) {
        if self.name_en.is_empty() {
            self.name_en = self.name_he.clone();
        }
        if self.name_he.is_empty() {
            self.name_he = self.name_en.clone();
        }
    }

    /// True when the product has no default unit established yet.
    pub fn default_unit_is_empty(&self) -> bool {
        self.default_unit_type_he.is_empty() && self.default_unit_type_en.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backfills_names() {
        let product = Product::new("חלב 3%", "");
        assert_eq!(product.name_en, "חלב 3%");
        let product = Product::new("", "Milk 3%");
        assert_eq!(product.name_he, "Milk 3%");
    }

    #[test]
    fn test_default_unit_is_empty() {
        let mut product = Product::new("חלב", "Milk");
        assert!(product.default_unit_is_empty());
        product.default_unit_type_en = "Liter".to_string();
        assert!(!product.default_unit_is_empty());
    }
}
