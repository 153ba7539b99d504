//! Fuzzy resolution of free-text names against the catalog.
//!
//! Stores get the full treatment (exact phase, alias search terms, branch
//! narrowing, prefix-chunk fallback with Hebrew double-letter expansion);
//! products and cities use simpler exact-then-containment ladders. All
//! candidate lists are capped and phase-ordered: exact hits always rank
//! before fuzzy ones.

use std::sync::Arc;

use shuk_core::city::{City, CityRepository, slugify};
use shuk_core::config::EngineConfig;
use shuk_core::error::Result;
use shuk_core::locale::contains_hebrew;
use shuk_core::product::{Product, ProductRepository};
use shuk_core::session::ReportDraft;
use shuk_core::store::{CityFilter, Store, StoreRepository};
use shuk_core::text::normalize_token;

/// Outcome of resolving free city text.
#[derive(Debug, Clone, PartialEq)]
pub enum CityResolution {
    /// A single city matched (exactly, or as the only containment hit).
    Exact(City),
    /// More than one plausible city; the caller must disambiguate.
    Candidates(Vec<City>),
    /// Nothing matched.
    NoMatch,
}

// Coarse spelling variants for the fuzzy chunk: doubled vav/yod are the
// common mater-lectionis spelling differences in store names.
const DOUBLE_LETTER_RULES: [(&str, &str); 2] = [("וו", "ו"), ("יי", "י")];

/// Resolves store, product and city names against the catalog.
#[derive(Clone)]
pub struct EntityResolver {
    cities: Arc<dyn CityRepository>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    config: EngineConfig,
}

impl EntityResolver {
    pub fn new(
        cities: Arc<dyn CityRepository>,
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        config: EngineConfig,
    ) -> Self {
        Self {
            cities,
            stores,
            products,
            config,
        }
    }

    /// Builds the store city filter out of what the draft knows so far.
    pub fn city_filter(draft: &ReportDraft) -> CityFilter {
        if let Some(id) = &draft.city_id {
            return CityFilter::by_id(id.clone());
        }
        let names: Vec<String> = [&draft.city_he, &draft.city_en]
            .into_iter()
            .flatten()
            .filter(|n| !n.is_empty())
            .cloned()
            .collect();
        if names.is_empty() {
            CityFilter::any()
        } else {
            CityFilter::by_names(names)
        }
    }

    /// Ranked store candidates for a free-text name, capped.
    ///
    /// Exact phase first (name/display-name equality or search-term alias
    /// hit, optionally narrowed by the branch detail), then the containment
    /// fallback on the first characters of the normalized query. Duplicates
    /// collapse across phases, exact phase first.
    pub async fn find_store_candidates(
        &self,
        name: &str,
        filter: &CityFilter,
        branch_detail: Option<&str>,
    ) -> Result<Vec<Store>> {
        let mut candidates: Vec<Store> = Vec::new();

        let mut exact = self.stores.find_by_name(name, filter).await?;
        let token = normalize_token(name);
        for store in self.stores.find_by_search_term(&token, filter).await? {
            if !exact.iter().any(|s| s.id == store.id) {
                exact.push(store);
            }
        }

        if let Some(detail) = branch_detail.map(str::trim).filter(|d| !d.is_empty()) {
            let needle = detail.to_lowercase();
            let narrowed: Vec<Store> = exact
                .iter()
                .filter(|s| {
                    s.name.to_lowercase().contains(&needle)
                        || s.display_name.to_lowercase().contains(&needle)
                        || s.address.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();
            if !narrowed.is_empty() {
                exact = narrowed;
            }
        }

        if !exact.is_empty() {
            candidates = exact;
            candidates.truncate(self.config.max_store_candidates);
            return Ok(candidates);
        }

        // fallback: containment on a short prefix chunk of the normalized
        // query, expanded through the double-letter rules. Coarse on
        // purpose; short names produce false positives.
        let normalized = normalize_token(name);
        let chunk: String = normalized
            .chars()
            .take(self.config.fuzzy_prefix_len)
            .collect();
        if chunk.is_empty() {
            return Ok(candidates);
        }
        for variant in chunk_variants(&chunk) {
            for store in self.stores.find_name_contains(&variant, filter).await? {
                if !candidates.iter().any(|s| s.id == store.id) {
                    candidates.push(store);
                }
            }
        }
        candidates.truncate(self.config.max_store_candidates);
        Ok(candidates)
    }

    /// Resolves the draft's store to a catalog record, creating one when
    /// nothing matches unambiguously.
    ///
    /// A pinned `store_id` (set by the confirmation step) always wins.
    /// Otherwise a single unique candidate is reused; anything else becomes
    /// a new store backfilled with the resolved city.
    pub async fn get_or_create_store(
        &self,
        draft: &ReportDraft,
        city: Option<&City>,
    ) -> Result<Store> {
        if let Some(id) = &draft.store_id {
            if let Some(store) = self.stores.find_by_id(id).await? {
                return Ok(store);
            }
        }

        let name = draft
            .store_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown store");
        let filter = Self::city_filter(draft);
        let candidates = self
            .find_store_candidates(name, &filter, draft.branch.as_deref())
            .await?;
        if candidates.len() == 1 {
            return Ok(candidates.into_iter().next().expect("len checked"));
        }

        let mut store = Store::new(name);
        if let Some(branch) = draft.branch.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
            store.address = branch.to_string();
        }
        match city {
            Some(city) => {
                store.city_id = Some(city.id.clone());
                store.city_he = city.name_he.clone();
                store.city_en = city.name_en.clone();
                store.city = city.display_name().to_string();
            }
            None => {
                store.city_he = draft.city_he.clone().unwrap_or_default();
                store.city_en = draft.city_en.clone().unwrap_or_default();
                store.city = draft.city_display(false).to_string();
            }
        }
        self.stores.save(&store).await?;
        Ok(store)
    }

    /// Resolves a product name: exact Hebrew, exact English, brand-scoped
    /// prefix containment, unscoped containment, else a new record.
    pub async fn get_or_create_product(
        &self,
        name: &str,
        brand: Option<&str>,
    ) -> Result<Product> {
        let name = {
            let trimmed = name.trim();
            if trimmed.is_empty() { "Unknown product" } else { trimmed }
        };
        if let Some(product) = self.products.find_by_name_he(name).await? {
            return Ok(product);
        }
        if let Some(product) = self.products.find_by_name_en(name).await? {
            return Ok(product);
        }
        if name.chars().count() >= 3 {
            let fragment: String = name.chars().take(3).collect();
            if brand.is_some() {
                if let Some(product) = self
                    .products
                    .find_name_contains(&fragment, brand)
                    .await?
                    .into_iter()
                    .next()
                {
                    return Ok(product);
                }
            }
            if let Some(product) = self
                .products
                .find_name_contains(&fragment, None)
                .await?
                .into_iter()
                .next()
            {
                return Ok(product);
            }
        }

        let mut product = if contains_hebrew(name) {
            Product::new(name, "")
        } else {
            Product::new("", name)
        };
        if let Some(brand) = brand.map(str::trim).filter(|b| !b.is_empty()) {
            product.brand = brand.to_string();
        }
        self.products.save(&product).await?;
        Ok(product)
    }

    /// Resolves free city text to exact / candidate-list / no-match.
    pub async fn resolve_city(&self, text: &str) -> Result<CityResolution> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(CityResolution::NoMatch);
        }
        if let Some(city) = self.cities.find_by_name(query).await? {
            return Ok(CityResolution::Exact(city));
        }
        let mut candidates = self.cities.find_name_contains(query).await?;
        candidates.truncate(self.config.max_store_candidates);
        Ok(match candidates.len() {
            0 => CityResolution::NoMatch,
            1 => CityResolution::Exact(candidates.into_iter().next().expect("len checked")),
            _ => CityResolution::Candidates(candidates),
        })
    }

    /// Creates a new city from free text, filling the bilingual name by
    /// script and allocating a unique slug.
    pub async fn create_city(&self, text: &str) -> Result<City> {
        let name = text.trim();
        let (he, en) = if contains_hebrew(name) {
            (name, "")
        } else {
            ("", name)
        };
        let slug = self.allocate_slug(name).await?;
        let city = City::new(he, en, slug);
        self.cities.save(&city).await?;
        Ok(city)
    }

    async fn allocate_slug(&self, name: &str) -> Result<String> {
        let base = slugify(name);
        let mut candidate = base.clone();
        let mut counter = 1usize;
        while self.cities.slug_exists(&candidate).await? {
            counter += 1;
            candidate = format!("{base}-{counter}");
        }
        Ok(candidate)
    }
}

fn chunk_variants(chunk: &str) -> Vec<String> {
    let mut variants = vec![chunk.to_string()];
    for (double, single) in DOUBLE_LETTER_RULES {
        let expanded = if chunk.contains(double) {
            chunk.replace(double, single)
        } else if chunk.contains(single) {
            chunk.replace(single, double)
        } else {
            continue;
        };
        if !variants.contains(&expanded) {
            variants.push(expanded);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuk_infrastructure::memory::{
        InMemoryCityRepository, InMemoryProductRepository, InMemoryStoreRepository,
    };

    fn resolver() -> (
        EntityResolver,
        Arc<InMemoryCityRepository>,
        Arc<InMemoryStoreRepository>,
        Arc<InMemoryProductRepository>,
    ) {
        let cities = Arc::new(InMemoryCityRepository::new());
        let stores = Arc::new(InMemoryStoreRepository::new());
        let products = Arc::new(InMemoryProductRepository::new());
        let resolver = EntityResolver::new(
            cities.clone(),
            stores.clone(),
            products.clone(),
            EngineConfig::default(),
        );
        (resolver, cities, stores, products)
    }

    #[tokio::test]
    async fn test_alias_and_canonical_queries_match_identically() {
        let (resolver, _, stores, _) = resolver();
        let mut store = Store::new("שופרסל");
        store.aliases_he = vec!["שוופרסל".to_string()];
        stores.save(&store).await.unwrap();

        let canonical = resolver
            .find_store_candidates("שופרסל", &CityFilter::any(), None)
            .await
            .unwrap();
        let alias = resolver
            .find_store_candidates("שוופרסל", &CityFilter::any(), None)
            .await
            .unwrap();
        let ids = |v: &[Store]| v.iter().map(|s| s.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&canonical), ids(&alias));
        assert_eq!(canonical.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_uses_double_letter_expansion() {
        let (resolver, _, stores, _) = resolver();
        stores.save(&Store::new("ויקטורי סיטי")).await.unwrap();

        // doubled-vav spelling, no alias registered; only the chunk
        // expansion can find it
        let found = resolver
            .find_store_candidates("וויקטורי", &CityFilter::any(), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "ויקטורי סיטי");
    }

    #[tokio::test]
    async fn test_branch_detail_narrows_exact_set() {
        let (resolver, _, stores, _) = resolver();
        let mut north = Store::new("Mega");
        north.address = "North Boulevard 1".to_string();
        stores.save(&north).await.unwrap();
        let mut south = Store::new("Mega");
        south.address = "South Street 9".to_string();
        stores.save(&south).await.unwrap();

        let narrowed = resolver
            .find_store_candidates("Mega", &CityFilter::any(), Some("south"))
            .await
            .unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].id, south.id);

        // a detail that matches nothing leaves the full exact set
        let unchanged = resolver
            .find_store_candidates("Mega", &CityFilter::any(), Some("east"))
            .await
            .unwrap();
        assert_eq!(unchanged.len(), 2);
    }

    #[tokio::test]
    async fn test_candidates_capped() {
        let (resolver, _, stores, _) = resolver();
        for i in 0..8 {
            let mut store = Store::new("Mega");
            store.address = format!("Branch {i}");
            stores.save(&store).await.unwrap();
        }
        let found = resolver
            .find_store_candidates("Mega", &CityFilter::any(), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 5);
    }

    #[tokio::test]
    async fn test_get_or_create_store_reuses_unique_match() {
        let (resolver, _, stores, _) = resolver();
        let existing = Store::new("Shufersal Deal");
        stores.save(&existing).await.unwrap();

        let draft = ReportDraft {
            store_name: Some("Shufersal Deal".to_string()),
            ..Default::default()
        };
        let resolved = resolver.get_or_create_store(&draft, None).await.unwrap();
        assert_eq!(resolved.id, existing.id);
    }

    #[tokio::test]
    async fn test_get_or_create_store_backfills_city() {
        let (resolver, cities, _, _) = resolver();
        let city = City::new("חולון", "Holon", "holon");
        cities.save(&city).await.unwrap();

        let draft = ReportDraft {
            store_name: Some("מכולת הפינה".to_string()),
            ..Default::default()
        };
        let created = resolver
            .get_or_create_store(&draft, Some(&city))
            .await
            .unwrap();
        assert_eq!(created.city_id.as_deref(), Some(city.id.as_str()));
        assert_eq!(created.city_en, "Holon");
        assert_eq!(created.city_he, "חולון");
    }

    #[tokio::test]
    async fn test_product_resolution_ladder() {
        let (resolver, _, _, products) = resolver();
        let mut existing = Product::new("חלב 3% 1 ליטר", "");
        existing.brand = "תנובה".to_string();
        products.save(&existing).await.unwrap();

        // exact Hebrew
        let exact = resolver
            .get_or_create_product("חלב 3% 1 ליטר", None)
            .await
            .unwrap();
        assert_eq!(exact.id, existing.id);

        // brand-scoped prefix containment
        let scoped = resolver
            .get_or_create_product("חלב אחר", Some("תנובה"))
            .await
            .unwrap();
        assert_eq!(scoped.id, existing.id);

        // nothing matches: a new record
        let fresh = resolver.get_or_create_product("קפה נמס", None).await.unwrap();
        assert_ne!(fresh.id, existing.id);
        assert_eq!(fresh.name_he, "קפה נמס");
    }

    #[tokio::test]
    async fn test_city_resolution_and_slug_allocation() {
        let (resolver, cities, _, _) = resolver();
        cities
            .save(&City::new("", "Ramat Gan", "ramat-gan"))
            .await
            .unwrap();
        cities
            .save(&City::new("", "Ramat Hasharon", "ramat-hasharon"))
            .await
            .unwrap();

        match resolver.resolve_city("Ramat Gan").await.unwrap() {
            CityResolution::Exact(city) => assert_eq!(city.slug, "ramat-gan"),
            other => panic!("expected exact match, got {other:?}"),
        }
        match resolver.resolve_city("ramat").await.unwrap() {
            CityResolution::Candidates(list) => assert_eq!(list.len(), 2),
            other => panic!("expected candidates, got {other:?}"),
        }
        assert_eq!(
            resolver.resolve_city("Eilat").await.unwrap(),
            CityResolution::NoMatch
        );

        // slug collision gets a numeric suffix
        let dup = resolver.create_city("Ramat Gan North").await.unwrap();
        assert_eq!(dup.slug, "ramat-gan-north");
        let clash = resolver.create_city("Ramat Gan").await.unwrap();
        assert_eq!(clash.slug, "ramat-gan-2");
    }
}
