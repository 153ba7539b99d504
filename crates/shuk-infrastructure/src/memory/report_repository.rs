//! In-memory price report repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use shuk_core::city::CityRepository;
use shuk_core::error::Result;
use shuk_core::product::{Product, ProductRepository};
use shuk_core::report::{PriceReport, PriceReportRepository, ReportQuery};
use shuk_core::store::{Store, StoreRepository};

/// In-memory price report log.
///
/// The search predicate spans three entities (report text, product names,
/// store city), so this implementation holds handles to the store, product
/// and city repositories the same way a SQL implementation would join.
#[derive(Clone)]
pub struct InMemoryPriceReportRepository {
    reports: Arc<RwLock<HashMap<String, PriceReport>>>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    cities: Arc<dyn CityRepository>,
}

impl InMemoryPriceReportRepository {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        cities: Arc<dyn CityRepository>,
    ) -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
            stores,
            products,
            cities,
        }
    }

    /// Total number of stored reports, moderated or not. Test support.
    pub async fn count(&self) -> usize {
        self.reports.read().await.len()
    }

    /// The most recently created report, moderated or not. Test support.
    pub async fn latest(&self) -> Option<PriceReport> {
        self.reports
            .read()
            .await
            .values()
            .max_by_key(|r| r.created_at)
            .cloned()
    }

    fn product_matches(report: &PriceReport, product: Option<&Product>, needle: &str) -> bool {
        if report.product_text_raw.to_lowercase().contains(needle) {
            return true;
        }
        product.is_some_and(|p| {
            p.name_he.to_lowercase().contains(needle) || p.name_en.to_lowercase().contains(needle)
        })
    }

    fn brand_matches(product: Option<&Product>, needle: &str) -> bool {
        product.is_some_and(|p| {
            p.brand.to_lowercase().contains(needle)
                || p.name_he.to_lowercase().contains(needle)
                || p.name_en.to_lowercase().contains(needle)
        })
    }

    async fn city_matches(&self, store: Option<&Store>, needle: &str) -> Result<bool> {
        let Some(store) = store else {
            return Ok(false);
        };
        let direct = [&store.city, &store.city_he, &store.city_en]
            .iter()
            .any(|f| f.to_lowercase() == needle);
        if direct {
            return Ok(true);
        }
        if let Some(city_id) = &store.city_id {
            if let Some(city) = self.cities.find_by_id(city_id).await? {
                return Ok(city.matches_name(needle));
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl PriceReportRepository for InMemoryPriceReportRepository {
    async fn find_by_id(&self, report_id: &str) -> Result<Option<PriceReport>> {
        let reports = self.reports.read().await;
        Ok(reports.get(report_id).cloned())
    }

    async fn create(&self, report: &PriceReport) -> Result<()> {
        let mut reports = self.reports.write().await;
        reports.insert(report.id.clone(), report.clone());
        Ok(())
    }

    async fn search(&self, query: &ReportQuery) -> Result<Vec<PriceReport>> {
        let product_needle = query.product.trim().to_lowercase();
        let brand_needle = query
            .brand
            .as_deref()
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty());
        let city_needle = query
            .city
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        let candidates: Vec<PriceReport> = {
            let reports = self.reports.read().await;
            reports
                .values()
                .filter(|r| !r.needs_moderation)
                .cloned()
                .collect()
        };

        let mut matched = Vec::new();
        for report in candidates {
            let product = self.products.find_by_id(&report.product_id).await?;
            let store = self.stores.find_by_id(&report.store_id).await?;

            if !Self::product_matches(&report, product.as_ref(), &product_needle) {
                continue;
            }
            if let Some(brand) = &brand_needle {
                if !Self::brand_matches(product.as_ref(), brand) {
                    continue;
                }
            }
            if let Some(city) = &city_needle {
                if !self.city_matches(store.as_ref(), city).await? {
                    continue;
                }
            }
            matched.push(report);
        }

        matched.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        Ok(matched)
    }
}
