//! Price report domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// A user-submitted observation: product at a store at a price and time.
///
/// Immutable once created; the raw free-text fields are kept for audit.
/// Every new report starts with `needs_moderation = true` and only a
/// moderator flips it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReport {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub store_id: String,
    /// Price in local currency, quantized to 2 decimal places.
    pub price: Decimal,
    /// Number of units covered by the reported price (e.g. 3 for a 3-pack).
    pub units_in_price: u32,
    #[serde(default)]
    pub unit_measure_type_he: String,
    #[serde(default)]
    pub unit_measure_type_en: String,
    #[serde(default)]
    pub unit_measure_quantity: Option<Decimal>,
    /// Whether the deal is restricted to loyalty/club members.
    pub club_only: bool,
    /// Minimum cart total required to redeem the deal.
    #[serde(default)]
    pub min_cart_total: Option<Decimal>,
    /// Free-text qualifier for other deal conditions.
    #[serde(default)]
    pub deal_notes: String,
    /// Product text exactly as the reporter typed it.
    #[serde(default)]
    pub product_text_raw: String,
    pub locale: Locale,
    pub source: String,
    pub observed_at: DateTime<Utc>,
    pub needs_moderation: bool,
    pub created_at: DateTime<Utc>,
}

impl PriceReport {
    /// Unit display text preferring the requested locale.
    pub fn unit_measure_for(&self, locale: Locale) -> &str {
        match locale {
            Locale::He if !self.unit_measure_type_he.is_empty() => &self.unit_measure_type_he,
            _ if !self.unit_measure_type_en.is_empty() => &self.unit_measure_type_en,
            _ => &self.unit_measure_type_he,
        }
    }
}
