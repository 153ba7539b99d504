//! Turns a completed report session into persisted catalog records.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use shuk_core::city::CityRepository;
use shuk_core::config::EngineConfig;
use shuk_core::error::Result;
use shuk_core::i18n::{MessageKey, Translator};
use shuk_core::product::ProductRepository;
use shuk_core::report::{PriceReport, PriceReportRepository};
use shuk_core::session::{ReportDraft, ReportSession};
use shuk_core::user::User;

use crate::entity_resolver::EntityResolver;

/// Materializes session drafts into `PriceReport` rows, with get-or-create
/// semantics for the referenced store and product.
///
/// Materialization is idempotent per session: the created report id is
/// written back into the draft and a second call short-circuits to a lookup.
/// A missing price aborts without creating anything; price is the one
/// mandatory answer.
#[derive(Clone)]
pub struct ReportMaterializer {
    resolver: EntityResolver,
    cities: Arc<dyn CityRepository>,
    products: Arc<dyn ProductRepository>,
    reports: Arc<dyn PriceReportRepository>,
    translator: Arc<dyn Translator>,
    config: EngineConfig,
}

impl ReportMaterializer {
    pub fn new(
        resolver: EntityResolver,
        cities: Arc<dyn CityRepository>,
        products: Arc<dyn ProductRepository>,
        reports: Arc<dyn PriceReportRepository>,
        translator: Arc<dyn Translator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            cities,
            products,
            reports,
            translator,
            config,
        }
    }

    /// Creates the price report for a completed session.
    ///
    /// Returns the existing report when the session already materialized,
    /// and `None` when the draft has no parsed price.
    pub async fn materialize(
        &self,
        session: &mut ReportSession,
        user: &User,
    ) -> Result<Option<PriceReport>> {
        if let Some(report_id) = session.draft.report_id.clone() {
            return self.reports.find_by_id(&report_id).await;
        }

        let draft = session.draft.clone();
        let Some(price) = draft.price else {
            return Ok(None);
        };
        let mut price = price.round_dp(2);
        price.rescale(2);

        let city = match &draft.city_id {
            Some(id) => self.cities.find_by_id(id).await?,
            None => None,
        };
        let store = self.resolver.get_or_create_store(&draft, city.as_ref()).await?;

        let product_name = draft.product_name.clone().unwrap_or_default();
        let mut product = self
            .resolver
            .get_or_create_product(&product_name, draft.brand.as_deref())
            .await?;

        // session answers win; product defaults only fill gaps
        let (unit_he, unit_en) = if draft.has_unit() {
            (
                draft.unit_type_he.clone().unwrap_or_default(),
                draft.unit_type_en.clone().unwrap_or_default(),
            )
        } else {
            (
                product.default_unit_type_he.clone(),
                product.default_unit_type_en.clone(),
            )
        };
        let unit_quantity = draft.unit_quantity.or(product.default_unit_quantity);

        let report = PriceReport {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            product_id: product.id.clone(),
            store_id: store.id.clone(),
            price,
            units_in_price: draft.units_in_price.unwrap_or(1),
            unit_measure_type_he: unit_he,
            unit_measure_type_en: unit_en,
            unit_measure_quantity: unit_quantity.map(quantized),
            club_only: draft.club_only.unwrap_or(false),
            min_cart_total: draft.min_cart_total.map(quantized),
            deal_notes: self.build_deal_notes(&draft, user),
            product_text_raw: product_name,
            locale: user.locale,
            source: "chat".to_string(),
            observed_at: Utc::now(),
            needs_moderation: true,
            created_at: Utc::now(),
        };
        self.reports.create(&report).await?;
        session.draft.report_id = Some(report.id.clone());

        // one-way backfill: establish the product's default unit from the
        // first report that supplies one, never overwrite an existing default
        if product.default_unit_is_empty() && draft.has_unit() {
            product.default_unit_type_he = report.unit_measure_type_he.clone();
            product.default_unit_type_en = report.unit_measure_type_en.clone();
            if product.default_unit_quantity.is_none() {
                product.default_unit_quantity = draft.unit_quantity.map(quantized);
            }
            self.products.save(&product).await?;
        }

        Ok(Some(report))
    }

    fn build_deal_notes(&self, draft: &ReportDraft, user: &User) -> String {
        let mut notes: Vec<String> = Vec::new();
        if let Some(limit) = draft.limit_qty {
            notes.push(self.translator.translate(
                MessageKey::DealNoteLimit,
                user.locale,
                &[("limit", limit.to_string())],
            ));
        }
        let joined = notes.join("; ");
        joined.chars().take(self.config.max_deal_notes_len).collect()
    }
}

fn quantized(value: Decimal) -> Decimal {
    let mut v = value.round_dp(2);
    v.rescale(2);
    v
}
