//! In-memory store repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use shuk_core::error::Result;
use shuk_core::store::{CityFilter, Store, StoreRepository};

/// In-memory store catalog.
#[derive(Default, Clone)]
pub struct InMemoryStoreRepository {
    stores: Arc<RwLock<HashMap<String, Store>>>,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect<F>(&self, filter: &CityFilter, predicate: F) -> Vec<Store>
    where
        F: Fn(&Store) -> bool,
    {
        let stores = self.stores.read().await;
        let mut found: Vec<Store> = stores
            .values()
            .filter(|s| s.is_active && filter.accepts(s) && predicate(s))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_by_id(&self, store_id: &str) -> Result<Option<Store>> {
        let stores = self.stores.read().await;
        Ok(stores.get(store_id).cloned())
    }

    async fn find_by_name(&self, name: &str, filter: &CityFilter) -> Result<Vec<Store>> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .collect(filter, |s| {
                s.name.to_lowercase() == needle || s.display_name.to_lowercase() == needle
            })
            .await)
    }

    async fn find_by_search_term(&self, token: &str, filter: &CityFilter) -> Result<Vec<Store>> {
        if token.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .collect(filter, |s| s.search_terms.contains(token))
            .await)
    }

    async fn find_name_contains(
        &self,
        fragment: &str,
        filter: &CityFilter,
    ) -> Result<Vec<Store>> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .collect(filter, |s| {
                s.name.to_lowercase().contains(&needle)
                    || s.display_name.to_lowercase().contains(&needle)
            })
            .await)
    }

    async fn save(&self, store: &Store) -> Result<()> {
        let mut stored = store.clone();
        // search_terms are derived data; recompute on every write
        stored.refresh_search_terms();
        stored.updated_at = chrono::Utc::now();
        let mut stores = self.stores.write().await;
        stores.insert(stored.id.clone(), stored);
        Ok(())
    }
}
