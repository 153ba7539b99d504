//! Product repository trait.

use async_trait::async_trait;

use super::model::Product;
use crate::error::Result;

/// An abstract repository for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Finds a product by id.
    async fn find_by_id(&self, product_id: &str) -> Result<Option<Product>>;

    /// Case-insensitive exact match on the Hebrew name.
    async fn find_by_name_he(&self, name: &str) -> Result<Option<Product>>;

    /// Case-insensitive exact match on the English name.
    async fn find_by_name_en(&self, name: &str) -> Result<Option<Product>>;

    /// Products whose Hebrew name contains the fragment, case-insensitively,
    /// optionally scoped to a brand (case-insensitive containment on the
    /// brand field).
    async fn find_name_contains(
        &self,
        fragment: &str,
        brand: Option<&str>,
    ) -> Result<Vec<Product>>;

    /// Inserts or updates a product.
    async fn save(&self, product: &Product) -> Result<()>;
}
