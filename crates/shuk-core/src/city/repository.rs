//! City repository trait.

use async_trait::async_trait;

use super::model::City;
use crate::error::Result;

/// An abstract repository for canonical cities.
#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Finds a city by id.
    async fn find_by_id(&self, city_id: &str) -> Result<Option<City>>;

    /// Finds a city by case-insensitive exact match on either bilingual name.
    async fn find_by_name(&self, name: &str) -> Result<Option<City>>;

    /// Lists active cities whose bilingual names contain the fragment,
    /// case-insensitively. Used to build disambiguation lists.
    async fn find_name_contains(&self, fragment: &str) -> Result<Vec<City>>;

    /// True when a city with this slug already exists.
    async fn slug_exists(&self, slug: &str) -> Result<bool>;

    /// Inserts or updates a city.
    async fn save(&self, city: &City) -> Result<()>;
}
