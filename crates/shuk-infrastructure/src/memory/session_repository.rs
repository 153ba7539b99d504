//! In-memory session repositories.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use shuk_core::error::Result;
use shuk_core::session::{
    LookupSession, LookupSessionRepository, ReportSession, ReportSessionRepository,
};

/// In-memory store for price-report sessions.
#[derive(Default, Clone)]
pub struct InMemoryReportSessionRepository {
    sessions: Arc<RwLock<HashMap<String, ReportSession>>>,
}

impl InMemoryReportSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportSessionRepository for InMemoryReportSessionRepository {
    async fn find_active(&self, user_id: &str) -> Result<Option<ReportSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active)
            .max_by_key(|s| s.updated_at)
            .cloned())
    }

    async fn save(&self, session: &ReportSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn deactivate_all(&self, user_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        for session in sessions.values_mut() {
            if session.user_id == user_id && session.is_active {
                session.cancel();
            }
        }
        Ok(())
    }
}

/// In-memory store for price-search sessions.
#[derive(Default, Clone)]
pub struct InMemoryLookupSessionRepository {
    sessions: Arc<RwLock<HashMap<String, LookupSession>>>,
}

impl InMemoryLookupSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LookupSessionRepository for InMemoryLookupSessionRepository {
    async fn find_active(&self, user_id: &str) -> Result<Option<LookupSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active)
            .max_by_key(|s| s.updated_at)
            .cloned())
    }

    async fn save(&self, session: &LookupSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn deactivate_all(&self, user_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        for session in sessions.values_mut() {
            if session.user_id == user_id && session.is_active {
                session.cancel();
            }
        }
        Ok(())
    }
}
