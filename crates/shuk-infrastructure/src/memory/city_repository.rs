//! In-memory city repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use shuk_core::city::{City, CityRepository};
use shuk_core::error::Result;

/// In-memory store for canonical cities.
#[derive(Default, Clone)]
pub struct InMemoryCityRepository {
    cities: Arc<RwLock<HashMap<String, City>>>,
}

impl InMemoryCityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CityRepository for InMemoryCityRepository {
    async fn find_by_id(&self, city_id: &str) -> Result<Option<City>> {
        let cities = self.cities.read().await;
        Ok(cities.get(city_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<City>> {
        let cities = self.cities.read().await;
        Ok(cities
            .values()
            .find(|c| c.is_active && c.matches_name(name))
            .cloned())
    }

    async fn find_name_contains(&self, fragment: &str) -> Result<Vec<City>> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let cities = self.cities.read().await;
        let mut found: Vec<City> = cities
            .values()
            .filter(|c| {
                c.is_active
                    && (c.name_he.to_lowercase().contains(&needle)
                        || c.name_en.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        // deterministic order for disambiguation lists
        found.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(found)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let cities = self.cities.read().await;
        Ok(cities.values().any(|c| c.slug == slug))
    }

    async fn save(&self, city: &City) -> Result<()> {
        let mut stored = city.clone();
        stored.backfill_names();
        stored.updated_at = chrono::Utc::now();
        let mut cities = self.cities.write().await;
        cities.insert(stored.id.clone(), stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_match_either_language() {
        let repo = InMemoryCityRepository::new();
        repo.save(&City::new("תל אביב", "Tel Aviv", "tel-aviv"))
            .await
            .unwrap();

        assert!(repo.find_by_name("tel aviv").await.unwrap().is_some());
        assert!(repo.find_by_name("תל אביב").await.unwrap().is_some());
        assert!(repo.find_by_name("haifa").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contains_is_sorted_by_slug() {
        let repo = InMemoryCityRepository::new();
        repo.save(&City::new("", "Ramat Gan", "ramat-gan")).await.unwrap();
        repo.save(&City::new("", "Ramat Hasharon", "ramat-hasharon"))
            .await
            .unwrap();

        let found = repo.find_name_contains("ramat").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].slug, "ramat-gan");
    }

    #[tokio::test]
    async fn test_slug_exists() {
        let repo = InMemoryCityRepository::new();
        repo.save(&City::new("חיפה", "Haifa", "haifa")).await.unwrap();
        assert!(repo.slug_exists("haifa").await.unwrap());
        assert!(!repo.slug_exists("haifa-2").await.unwrap());
    }
}
