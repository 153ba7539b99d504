//! In-memory product repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use shuk_core::error::Result;
use shuk_core::product::{Product, ProductRepository};

/// In-memory product catalog.
#[derive(Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, product_id: &str) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(product_id).cloned())
    }

    async fn find_by_name_he(&self, name: &str) -> Result<Option<Product>> {
        let needle = name.trim().to_lowercase();
        let products = self.products.read().await;
        Ok(products
            .values()
            .find(|p| p.is_active && p.name_he.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_name_en(&self, name: &str) -> Result<Option<Product>> {
        let needle = name.trim().to_lowercase();
        let products = self.products.read().await;
        Ok(products
            .values()
            .find(|p| p.is_active && p.name_en.to_lowercase() == needle)
            .cloned())
    }

    async fn find_name_contains(
        &self,
        fragment: &str,
        brand: Option<&str>,
    ) -> Result<Vec<Product>> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let brand_needle = brand.map(|b| b.trim().to_lowercase());
        let products = self.products.read().await;
        let mut found: Vec<Product> = products
            .values()
            .filter(|p| p.is_active && p.name_he.to_lowercase().contains(&needle))
            .filter(|p| match &brand_needle {
                Some(b) => p.brand.to_lowercase().contains(b.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn save(&self, product: &Product) -> Result<()> {
        let mut stored = product.clone();
        stored.backfill_names();
        stored.updated_at = chrono::Utc::now();
        let mut products = self.products.write().await;
        products.insert(stored.id.clone(), stored);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_match_per_language() {
        let repo = InMemoryProductRepository::new();
        repo.save(&Product::new("חלב 3%", "Milk 3%")).await.unwrap();

        assert!(repo.find_by_name_he("חלב 3%").await.unwrap().is_some());
        assert!(repo.find_by_name_en("milk 3%").await.unwrap().is_some());
        assert!(repo.find_by_name_he("Milk").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_brand_scoped_containment() {
        let repo = InMemoryProductRepository::new();
        let mut tnuva = Product::new("חלב 3% 1 ליטר", "");
        tnuva.brand = "תנובה".to_string();
        repo.save(&tnuva).await.unwrap();
        let mut tara = Product::new("חלב 3% קרטון", "");
        tara.brand = "טרה".to_string();
        repo.save(&tara).await.unwrap();

        let scoped = repo.find_name_contains("חלב", Some("תנובה")).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].brand, "תנובה");

        let unscoped = repo.find_name_contains("חלב", None).await.unwrap();
        assert_eq!(unscoped.len(), 2);
    }
}
