//! Session repository traits.
//!
//! One trait per flow kind; the two flows are independent session stores.
//! Implementations must keep the single-active-session invariant: saving a
//! new active session after `deactivate_all` is the flow-start sequence.

use async_trait::async_trait;

use super::model::{LookupSession, ReportSession};
use crate::error::Result;

/// Persistence for price-report sessions.
#[async_trait]
pub trait ReportSessionRepository: Send + Sync {
    /// The user's most recently updated active session, if any.
    async fn find_active(&self, user_id: &str) -> Result<Option<ReportSession>>;

    /// Inserts or updates a session.
    async fn save(&self, session: &ReportSession) -> Result<()>;

    /// Cancels every active session of this user (step becomes `Canceled`,
    /// `is_active` false). Rows are kept.
    async fn deactivate_all(&self, user_id: &str) -> Result<()>;
}

/// Persistence for price-search sessions.
#[async_trait]
pub trait LookupSessionRepository: Send + Sync {
    /// The user's most recently updated active session, if any.
    async fn find_active(&self, user_id: &str) -> Result<Option<LookupSession>>;

    /// Inserts or updates a session.
    async fn save(&self, session: &LookupSession) -> Result<()>;

    /// Cancels every active session of this user. Rows are kept.
    async fn deactivate_all(&self, user_id: &str) -> Result<()>;
}
