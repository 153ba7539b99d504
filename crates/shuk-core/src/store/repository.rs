//! Store repository trait and query predicates.

use async_trait::async_trait;

use super::model::Store;
use crate::error::Result;

/// City constraint for store queries.
///
/// A resolved city id wins over free-text names. An empty filter matches
/// every store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityFilter {
    pub city_id: Option<String>,
    /// Case-insensitive OR-match against the store's bilingual city fields.
    pub names: Vec<String>,
}

impl CityFilter {
    pub fn by_id(city_id: impl Into<String>) -> Self {
        Self {
            city_id: Some(city_id.into()),
            names: Vec::new(),
        }
    }

    pub fn by_names(names: Vec<String>) -> Self {
        Self {
            city_id: None,
            names,
        }
    }

    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.city_id.is_none() && self.names.is_empty()
    }

    /// Whether a store satisfies this filter.
    pub fn accepts(&self, store: &Store) -> bool {
        if let Some(id) = &self.city_id {
            return store.city_id.as_deref() == Some(id.as_str());
        }
        if self.names.is_empty() {
            return true;
        }
        let fields = [&store.city, &store.city_he, &store.city_en];
        self.names.iter().any(|name| {
            let n = name.trim().to_lowercase();
            !n.is_empty() && fields.iter().any(|f| f.to_lowercase() == n)
        })
    }
}

/// An abstract repository for stores.
///
/// The predicates mirror what the entity resolver needs: exact name match,
/// search-term (alias token) match, and containment for the fuzzy fallback.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Finds a store by id.
    async fn find_by_id(&self, store_id: &str) -> Result<Option<Store>>;

    /// Stores whose `name` or `display_name` equals the query,
    /// case-insensitively, within the city filter.
    async fn find_by_name(&self, name: &str, filter: &CityFilter) -> Result<Vec<Store>>;

    /// Stores whose derived `search_terms` contain the normalized token,
    /// within the city filter.
    async fn find_by_search_term(&self, token: &str, filter: &CityFilter) -> Result<Vec<Store>>;

    /// Stores whose `name` or `display_name` contains the fragment,
    /// case-insensitively, within the city filter.
    async fn find_name_contains(&self, fragment: &str, filter: &CityFilter)
    -> Result<Vec<Store>>;

    /// Inserts or updates a store. Implementations must re-derive
    /// `search_terms` before persisting.
    async fn save(&self, store: &Store) -> Result<()>;
}
