//! Session domain models.
//!
//! One session per flow kind per user may be active at a time; starting a
//! new flow cancels the previous active session of that kind. Sessions are
//! deactivated, never deleted, so abandoned drafts stay inspectable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::draft::{LookupDraft, ReportDraft};
use super::step::{LookupStep, ReportStep};

/// An active or finished run of the price-report flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSession {
    pub id: String,
    pub user_id: String,
    pub step: ReportStep,
    pub draft: ReportDraft,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportSession {
    /// Creates a fresh active session at the first question.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            step: ReportStep::City,
            draft: ReportDraft::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the session into the absorbing canceled state.
    pub fn cancel(&mut self) {
        self.step = ReportStep::Canceled;
        self.is_active = false;
        self.touch();
    }

    /// Marks the session complete and inactive.
    pub fn complete(&mut self) {
        self.step = ReportStep::Complete;
        self.is_active = false;
        self.touch();
    }

    /// Bumps the updated-at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// An active or finished run of the price-search flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupSession {
    pub id: String,
    pub user_id: String,
    pub step: LookupStep,
    pub draft: LookupDraft,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LookupSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            step: LookupStep::Product,
            draft: LookupDraft::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn cancel(&mut self) {
        self.step = LookupStep::Canceled;
        self.is_active = false;
        self.touch();
    }

    pub fn complete(&mut self) {
        self.step = LookupStep::Complete;
        self.is_active = false;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_city() {
        let session = ReportSession::new("u-1");
        assert_eq!(session.step, ReportStep::City);
        assert!(session.is_active);
        assert!(!session.id.is_empty());
    }

    #[test]
    fn test_cancel_is_terminal_and_inactive() {
        let mut session = ReportSession::new("u-1");
        session.cancel();
        assert_eq!(session.step, ReportStep::Canceled);
        assert!(!session.is_active);
        assert!(session.step.is_terminal());
    }

    #[test]
    fn test_lookup_session_lifecycle() {
        let mut session = LookupSession::new("u-1");
        assert_eq!(session.step, LookupStep::Product);
        session.complete();
        assert!(!session.is_active);
    }
}
