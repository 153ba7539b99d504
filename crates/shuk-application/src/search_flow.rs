//! The price-search conversation flow.
//!
//! A shorter, read-only sibling of the report flow: product, optional
//! brand, city, then a capped result list. Results come only from moderated
//! reports and collapse per (store, product, brand) so a store that had the
//! same product reported many times surfaces once, at its latest price.

use std::collections::HashSet;
use std::sync::Arc;

use shuk_core::city::CityRepository;
use shuk_core::config::EngineConfig;
use shuk_core::error::Result;
use shuk_core::i18n::{MessageKey, Translator};
use shuk_core::locale::Locale;
use shuk_core::message::FlowReply;
use shuk_core::product::ProductRepository;
use shuk_core::report::{PriceReport, PriceReportRepository, ReportQuery};
use shuk_core::session::{LookupSession, LookupSessionRepository, LookupStep};
use shuk_core::store::StoreRepository;
use shuk_core::text::{KeywordCategory, is_keyword_norm, normalize_for_match};
use shuk_core::user::User;

/// Drives the search conversation for all users.
pub struct SearchFlowService {
    sessions: Arc<dyn LookupSessionRepository>,
    reports: Arc<dyn PriceReportRepository>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    cities: Arc<dyn CityRepository>,
    translator: Arc<dyn Translator>,
    config: EngineConfig,
}

impl SearchFlowService {
    pub fn new(
        sessions: Arc<dyn LookupSessionRepository>,
        reports: Arc<dyn PriceReportRepository>,
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        cities: Arc<dyn CityRepository>,
        translator: Arc<dyn Translator>,
        config: EngineConfig,
    ) -> Self {
        Self {
            sessions,
            reports,
            stores,
            products,
            cities,
            translator,
            config,
        }
    }

    /// Starts a fresh search flow, superseding any active one.
    pub async fn start(&self, user: &User) -> Result<FlowReply> {
        self.sessions.deactivate_all(&user.id).await?;
        let session = LookupSession::new(&user.id);
        self.sessions.save(&session).await?;
        Ok(self.plain_reply(MessageKey::SearchProductQuestion, user.locale))
    }

    /// Routes a message into the user's active search session.
    ///
    /// Returns `Ok(None)` when the user has no active search session.
    pub async fn handle_message(&self, user: &User, text: &str) -> Result<Option<FlowReply>> {
        let Some(mut session) = self.sessions.find_active(&user.id).await? else {
            return Ok(None);
        };
        let locale = user.locale;

        let raw = text.trim();
        if raw.is_empty() {
            return Ok(Some(self.plain_reply(MessageKey::EmptyReply, locale)));
        }
        let norm = normalize_for_match(raw);
        if is_keyword_norm(&norm, KeywordCategory::Cancel, locale) {
            session.cancel();
            self.sessions.save(&session).await?;
            return Ok(Some(self.plain_reply(MessageKey::CanceledSearch, locale)));
        }

        let reply = match session.step {
            LookupStep::Product => {
                session.draft.product_query = Some(raw.to_string());
                session.step = LookupStep::Brand;
                session.touch();
                self.sessions.save(&session).await?;
                self.plain_reply(MessageKey::SearchBrandQuestion, locale)
            }
            LookupStep::Brand => {
                let skip = is_keyword_norm(&norm, KeywordCategory::Skip, locale)
                    || is_keyword_norm(&norm, KeywordCategory::No, locale);
                session.draft.brand_query = if skip { None } else { Some(raw.to_string()) };
                session.step = LookupStep::Location;
                session.touch();
                self.sessions.save(&session).await?;
                self.plain_reply(MessageKey::SearchCityQuestion, locale)
            }
            LookupStep::Location => {
                session.draft.city = Some(raw.to_string());
                session.complete();
                self.sessions.save(&session).await?;
                self.render_results(&session, locale).await?
            }
            LookupStep::Complete | LookupStep::Canceled => {
                // terminal sessions are never returned by find_active;
                // close out defensively
                session.complete();
                self.sessions.save(&session).await?;
                self.plain_reply(MessageKey::GenericThanks, locale)
            }
        };
        Ok(Some(reply))
    }

    async fn render_results(&self, session: &LookupSession, locale: Locale) -> Result<FlowReply> {
        let Some(product_query) = session.draft.product_query.clone() else {
            return Ok(self.plain_reply(MessageKey::SearchRestart, locale));
        };

        let query = ReportQuery {
            product: product_query.clone(),
            brand: session.draft.brand_query.clone(),
            city: session.draft.city.clone(),
        };
        let reports = self.reports.search(&query).await?;
        let deduped = self.dedup_reports(reports).await?;

        if deduped.is_empty() {
            return Ok(FlowReply::text(self.translator.translate(
                MessageKey::SearchNoResults,
                locale,
                &[("product", product_query)],
            )));
        }

        let mut lines = vec![self.translator.plain(MessageKey::SearchResultsHeader, locale)];
        for report in &deduped {
            lines.push(self.result_line(report, locale).await?);
        }
        lines.push(self.translator.plain(MessageKey::SearchTip, locale));
        Ok(FlowReply::text(lines.join("\n")))
    }

    /// Keeps only the most recent report per (store, product, brand).
    ///
    /// Input is ordered newest first, so first-seen wins.
    async fn dedup_reports(&self, reports: Vec<PriceReport>) -> Result<Vec<PriceReport>> {
        let mut seen: HashSet<(String, String, String)> = HashSet::new();
        let mut out = Vec::new();
        for report in reports {
            let brand = match self.products.find_by_id(&report.product_id).await? {
                Some(product) => product.brand.to_lowercase(),
                None => String::new(),
            };
            let key = (report.store_id.clone(), report.product_id.clone(), brand);
            if seen.insert(key) {
                out.push(report);
            }
            if out.len() == self.config.max_search_results {
                break;
            }
        }
        Ok(out)
    }

    async fn result_line(&self, report: &PriceReport, locale: Locale) -> Result<String> {
        let product_display = if !report.product_text_raw.is_empty() {
            report.product_text_raw.clone()
        } else {
            match self.products.find_by_id(&report.product_id).await? {
                Some(product) => {
                    if locale.is_hebrew() {
                        product.name_he
                    } else {
                        product.name_en
                    }
                }
                None => String::new(),
            }
        };

        let store = self.stores.find_by_id(&report.store_id).await?;
        let (store_display, city_display) = match &store {
            Some(store) => (store.label().to_string(), self.store_city(store).await?),
            None => (String::new(), String::new()),
        };

        Ok(self.translator.translate(
            MessageKey::SearchResultLine,
            locale,
            &[
                ("product", product_display),
                ("price", report.price.to_string()),
                ("store", store_display),
                ("city", city_display),
            ],
        ))
    }

    async fn store_city(&self, store: &shuk_core::store::Store) -> Result<String> {
        if let Some(city_id) = &store.city_id {
            if let Some(city) = self.cities.find_by_id(city_id).await? {
                return Ok(city.display_name().to_string());
            }
        }
        let fallback = if !store.city.is_empty() {
            &store.city
        } else if !store.city_en.is_empty() {
            &store.city_en
        } else {
            &store.city_he
        };
        Ok(fallback.clone())
    }

    fn plain_reply(&self, key: MessageKey, locale: Locale) -> FlowReply {
        FlowReply::text(self.translator.plain(key, locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use shuk_core::i18n::StaticTranslator;
    use shuk_core::product::Product;
    use shuk_core::store::Store;
    use shuk_infrastructure::memory::{
        InMemoryCityRepository, InMemoryLookupSessionRepository, InMemoryPriceReportRepository,
        InMemoryProductRepository, InMemoryStoreRepository,
    };

    struct Fixture {
        flow: SearchFlowService,
        sessions: Arc<InMemoryLookupSessionRepository>,
        reports: Arc<InMemoryPriceReportRepository>,
        stores: Arc<InMemoryStoreRepository>,
        products: Arc<InMemoryProductRepository>,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(InMemoryLookupSessionRepository::new());
        let cities = Arc::new(InMemoryCityRepository::new());
        let stores = Arc::new(InMemoryStoreRepository::new());
        let products = Arc::new(InMemoryProductRepository::new());
        let reports = Arc::new(InMemoryPriceReportRepository::new(
            stores.clone(),
            products.clone(),
            cities.clone(),
        ));
        let flow = SearchFlowService::new(
            sessions.clone(),
            reports.clone(),
            stores.clone(),
            products.clone(),
            cities,
            Arc::new(StaticTranslator),
            EngineConfig::default(),
        );
        Fixture {
            flow,
            sessions,
            reports,
            stores,
            products,
        }
    }

    fn moderated_report(
        product: &Product,
        store: &Store,
        price: rust_decimal::Decimal,
        age_days: i64,
    ) -> PriceReport {
        PriceReport {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "reporter".to_string(),
            product_id: product.id.clone(),
            store_id: store.id.clone(),
            price,
            units_in_price: 1,
            unit_measure_type_he: String::new(),
            unit_measure_type_en: String::new(),
            unit_measure_quantity: None,
            club_only: false,
            min_cart_total: None,
            deal_notes: String::new(),
            product_text_raw: "Milk 3% 1L".to_string(),
            locale: Locale::En,
            source: "chat".to_string(),
            observed_at: Utc::now() - Duration::days(age_days),
            needs_moderation: false,
            created_at: Utc::now(),
        }
    }

    async fn run_search(f: &Fixture, user: &User, answers: [&str; 3]) -> FlowReply {
        f.flow.start(user).await.unwrap();
        let mut last = None;
        for answer in answers {
            last = f.flow.handle_message(user, answer).await.unwrap();
        }
        last.expect("search reply")
    }

    #[tokio::test]
    async fn test_search_happy_path_formats_results() {
        let f = fixture();
        let product = Product::new("", "Milk 3% 1L");
        f.products.save(&product).await.unwrap();
        let mut store = Store::new("Shufersal Deal");
        store.city_en = "Holon".to_string();
        f.stores.save(&store).await.unwrap();
        f.reports
            .create(&moderated_report(&product, &store, dec!(5.90), 0))
            .await
            .unwrap();

        let user = User::new("u-1", Locale::En);
        let reply = run_search(&f, &user, ["milk", "skip", "Holon"]).await;
        assert!(reply.text.contains("latest deals"));
        assert!(reply.text.contains("Milk 3% 1L"));
        assert!(reply.text.contains("5.90"));
        assert!(reply.text.contains("Shufersal Deal"));
        assert!(f.sessions.find_active("u-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_store_and_product_dedup_keeps_latest() {
        let f = fixture();
        let product = Product::new("", "Milk 3% 1L");
        f.products.save(&product).await.unwrap();
        let mut store = Store::new("Shufersal Deal");
        store.city_en = "Holon".to_string();
        f.stores.save(&store).await.unwrap();

        f.reports
            .create(&moderated_report(&product, &store, dec!(7.90), 5))
            .await
            .unwrap();
        f.reports
            .create(&moderated_report(&product, &store, dec!(5.90), 0))
            .await
            .unwrap();

        let user = User::new("u-1", Locale::En);
        let reply = run_search(&f, &user, ["milk", "skip", "Holon"]).await;
        assert!(reply.text.contains("5.90"));
        assert!(!reply.text.contains("7.90"));
    }

    #[tokio::test]
    async fn test_unmoderated_reports_hidden() {
        let f = fixture();
        let product = Product::new("", "Milk 3% 1L");
        f.products.save(&product).await.unwrap();
        let store = Store::new("Mega");
        f.stores.save(&store).await.unwrap();
        let mut pending = moderated_report(&product, &store, dec!(5.90), 0);
        pending.needs_moderation = true;
        f.reports.create(&pending).await.unwrap();

        let user = User::new("u-1", Locale::En);
        let reply = run_search(&f, &user, ["milk", "skip", "anywhere"]).await;
        assert!(reply.text.contains("couldn't find"));
    }

    #[tokio::test]
    async fn test_brand_filter_and_skip() {
        let f = fixture();
        let mut tnuva = Product::new("", "Milk Tnuva 3%");
        tnuva.brand = "Tnuva".to_string();
        f.products.save(&tnuva).await.unwrap();
        let mut tara = Product::new("", "Milk Tara 3%");
        tara.brand = "Tara".to_string();
        f.products.save(&tara).await.unwrap();
        let mut store = Store::new("Mega");
        store.city_en = "Holon".to_string();
        f.stores.save(&store).await.unwrap();

        let mut tnuva_report = moderated_report(&tnuva, &store, dec!(5.90), 0);
        tnuva_report.product_text_raw = "Milk Tnuva 3%".to_string();
        f.reports.create(&tnuva_report).await.unwrap();
        let mut tara_report = moderated_report(&tara, &store, dec!(4.90), 0);
        tara_report.product_text_raw = "Milk Tara 3%".to_string();
        f.reports.create(&tara_report).await.unwrap();

        let user = User::new("u-1", Locale::En);
        let reply = run_search(&f, &user, ["milk", "Tnuva", "Holon"]).await;
        assert!(reply.text.contains("Tnuva"));
        assert!(!reply.text.contains("Tara"));

        let reply = run_search(&f, &user, ["milk", "skip", "Holon"]).await;
        assert!(reply.text.contains("Tnuva"));
        assert!(reply.text.contains("Tara"));
    }

    #[tokio::test]
    async fn test_cancel_mid_search() {
        let f = fixture();
        let user = User::new("u-1", Locale::En);
        f.flow.start(&user).await.unwrap();
        f.flow.handle_message(&user, "milk").await.unwrap();

        let reply = f
            .flow
            .handle_message(&user, "cancel")
            .await
            .unwrap()
            .unwrap();
        assert!(reply.text.contains("stopped the search"));
        assert!(f.sessions.find_active("u-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_results_capped_at_five() {
        let f = fixture();
        let mut store = Store::new("Mega");
        store.city_en = "Holon".to_string();
        f.stores.save(&store).await.unwrap();
        for i in 0..7 {
            let product = Product::new("", format!("Milk variant {i}"));
            f.products.save(&product).await.unwrap();
            let mut report = moderated_report(&product, &store, dec!(5.00), 0);
            report.product_text_raw = format!("Milk variant {i}");
            f.reports.create(&report).await.unwrap();
        }

        let user = User::new("u-1", Locale::En);
        let reply = run_search(&f, &user, ["milk", "skip", "Holon"]).await;
        // header + 5 results + tip
        assert_eq!(reply.text.lines().count(), 7);
    }
}
