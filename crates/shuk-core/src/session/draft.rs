//! Typed session drafts.
//!
//! Collected answers used to live in an open string map; they are now a
//! versioned struct with an optional field per answer so step handlers get
//! compile-time guarantees about what they may read. Fields stay optional
//! because steps are conditionally skipped.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current draft schema version, stored alongside the data.
pub const DRAFT_VERSION: u32 = 1;

fn draft_version() -> u32 {
    DRAFT_VERSION
}

/// Answers accumulated by the price-report flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDraft {
    #[serde(default = "draft_version")]
    pub version: u32,
    /// Resolved city record, when one matched or was created.
    pub city_id: Option<String>,
    pub city_he: Option<String>,
    pub city_en: Option<String>,
    /// City ids offered in a pending disambiguation list.
    pub city_candidates: Vec<String>,
    /// Store name exactly as typed.
    pub store_name: Option<String>,
    /// Branch name/address detail; cleared by skip keywords.
    pub branch: Option<String>,
    /// Pinned store id after confirmation or a unique match.
    pub store_id: Option<String>,
    /// Store ids offered in a pending confirmation list.
    pub store_candidates: Vec<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub unit_type_slug: Option<String>,
    pub unit_type_he: Option<String>,
    pub unit_type_en: Option<String>,
    pub unit_quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub units_in_price: Option<u32>,
    pub club_only: Option<bool>,
    pub limit_qty: Option<u32>,
    pub min_cart_total: Option<Decimal>,
    /// Id of the materialized report; guards against double materialization.
    pub report_id: Option<String>,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self {
            version: DRAFT_VERSION,
            city_id: None,
            city_he: None,
            city_en: None,
            city_candidates: Vec::new(),
            store_name: None,
            branch: None,
            store_id: None,
            store_candidates: Vec::new(),
            product_name: None,
            brand: None,
            unit_type_slug: None,
            unit_type_he: None,
            unit_type_en: None,
            unit_quantity: None,
            price: None,
            units_in_price: None,
            club_only: None,
            limit_qty: None,
            min_cart_total: None,
            report_id: None,
        }
    }
}

impl ReportDraft {
    /// Clears everything captured about the store choice. Runs when the
    /// reporter re-answers the store question.
    pub fn reset_store(&mut self) {
        self.branch = None;
        self.store_id = None;
        self.store_candidates.clear();
    }

    /// True when the reporter supplied any unit information.
    pub fn has_unit(&self) -> bool {
        self.unit_type_he.is_some() || self.unit_type_en.is_some()
    }

    /// City display text for a Hebrew/English preference.
    pub fn city_display(&self, hebrew_first: bool) -> &str {
        let (first, second) = if hebrew_first {
            (&self.city_he, &self.city_en)
        } else {
            (&self.city_en, &self.city_he)
        };
        first
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(second.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("")
    }
}

/// Answers accumulated by the price-search flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupDraft {
    #[serde(default = "draft_version")]
    pub version: u32,
    pub product_query: Option<String>,
    pub brand_query: Option<String>,
    pub city: Option<String>,
}

impl Default for LookupDraft {
    fn default() -> Self {
        Self {
            version: DRAFT_VERSION,
            product_query: None,
            brand_query: None,
            city: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carries_version() {
        assert_eq!(ReportDraft::default().version, DRAFT_VERSION);
        assert_eq!(LookupDraft::default().version, DRAFT_VERSION);
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let draft: ReportDraft = serde_json::from_str("{\"store_name\":\"Mega\"}").unwrap();
        assert_eq!(draft.store_name.as_deref(), Some("Mega"));
        assert_eq!(draft.version, DRAFT_VERSION);
        assert!(draft.price.is_none());
    }

    #[test]
    fn test_reset_store() {
        let mut draft = ReportDraft {
            branch: Some("center".to_string()),
            store_id: Some("s-1".to_string()),
            store_candidates: vec!["s-1".to_string(), "s-2".to_string()],
            ..Default::default()
        };
        draft.reset_store();
        assert!(draft.branch.is_none());
        assert!(draft.store_id.is_none());
        assert!(draft.store_candidates.is_empty());
    }

    #[test]
    fn test_city_display_fallback() {
        let draft = ReportDraft {
            city_he: Some("חולון".to_string()),
            ..Default::default()
        };
        assert_eq!(draft.city_display(false), "חולון");
    }
}
