use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

pub type AccountId = u64;
pub type SessionId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub account_number: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub account_id: AccountId,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Close the session at `at`. Duration never goes negative.
    pub fn close(&mut self, at: DateTime<Utc>) {
        self.end = Some(at);
        self.duration_seconds = Some((at - self.start).num_seconds().max(0));
    }
}

/// One completed lesson. Unique per (account, module, lesson).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub account_id: AccountId,
    pub module_id: String,
    pub lesson_id: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub account_id: AccountId,
    pub achievement_id: String,
    pub earned_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountStats {
    pub lessons_completed: usize,
    pub total_time_seconds: i64,
    pub achievement_count: usize,
    /// Distinct days with a session start during the last seven days.
    pub current_streak: usize,
}

/// Everything the store persists, serialized as a single document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tables {
    pub schema_version: u32,
    #[serde(default)]
    pub next_account_id: AccountId,
    #[serde(default)]
    pub next_session_id: SessionId,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub account_progress: Vec<Progress>,
    #[serde(default)]
    pub account_sessions: Vec<Session>,
    #[serde(default)]
    pub account_achievements: Vec<Achievement>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            next_account_id: 1,
            next_session_id: 1,
            accounts: Vec::new(),
            account_progress: Vec::new(),
            account_sessions: Vec::new(),
            account_achievements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn tables_load_from_sparse_document() {
        let tables: Tables = serde_json::from_str(r#"{"schema_version": 1}"#).unwrap();
        assert!(tables.accounts.is_empty());
        assert!(tables.account_sessions.is_empty());
    }

    #[test]
    fn legacy_account_row_defaults_to_active() {
        let json = r#"{
            "id": 3,
            "account_number": "1234567890123456",
            "name": "Ann",
            "email": "a@b.com",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.is_active);
        assert!(account.last_login.is_none());
    }

    #[test]
    fn closing_session_records_duration() {
        let start = Utc::now();
        let mut session = Session {
            id: 1,
            account_id: 1,
            start,
            end: None,
            duration_seconds: None,
        };
        assert!(session.is_open());
        session.close(start + Duration::seconds(90));
        assert!(!session.is_open());
        assert_eq!(session.duration_seconds, Some(90));
    }
}
