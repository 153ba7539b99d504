//! In-memory user repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use shuk_core::error::Result;
use shuk_core::user::{User, UserRepository};

/// In-memory store for user profiles.
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn save(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuk_core::locale::Locale;

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_by_id("u-1").await.unwrap().is_none());

        let mut user = User::new("u-1", Locale::He);
        repo.save(&user).await.unwrap();

        user.city_en = "Holon".to_string();
        repo.save(&user).await.unwrap();

        let stored = repo.find_by_id("u-1").await.unwrap().unwrap();
        assert_eq!(stored.city_en, "Holon");
        assert_eq!(stored.locale, Locale::He);
    }
}
