//! User repository trait.

use async_trait::async_trait;

use super::model::User;
use crate::error::Result;

/// An abstract repository for user profiles.
///
/// The transport layer owns user identity; this trait only persists the
/// profile fields the conversation reads and writes (locale, saved city,
/// last-seen timestamp).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by the transport sender id.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>>;

    /// Inserts or updates a user profile.
    async fn save(&self, user: &User) -> Result<()>;
}
