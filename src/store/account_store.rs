use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Days, Utc};
use tracing::{debug, warn};

use crate::store::StoreError;
use crate::store::account_number;
use crate::store::json_store::JsonStore;
use crate::store::schema::{
    Account, AccountId, AccountStats, Achievement, Progress, Session, SessionId, Tables,
};

pub const MAX_GENERATION_ATTEMPTS: usize = 100;
const STREAK_WINDOW_DAYS: u64 = 7;

/// Accounts, progress, sessions and achievements behind one read/write lock.
///
/// Reads share the lock. Writes hold it exclusively, apply the change to a
/// copy of the tables, persist the copy and only then swap it in, so a failed
/// write leaves both memory and disk as they were.
pub struct AccountStore {
    backend: JsonStore,
    tables: RwLock<Tables>,
}

impl AccountStore {
    pub fn open(base_dir: PathBuf) -> Result<Self, StoreError> {
        Self::from_backend(JsonStore::with_base_dir(base_dir)?)
    }

    fn from_backend(backend: JsonStore) -> Result<Self, StoreError> {
        let tables = backend.load_tables()?;
        debug!(
            dir = %backend.base_dir().display(),
            accounts = tables.accounts.len(),
            "account store opened"
        );
        Ok(Self {
            backend,
            tables: RwLock::new(tables),
        })
    }

    pub fn base_dir(&self) -> &Path {
        self.backend.base_dir()
    }

    fn read<R>(&self, op: impl FnOnce(&Tables) -> R) -> Result<R, StoreError> {
        let guard = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(op(&guard))
    }

    fn write<R>(
        &self,
        op: impl FnOnce(&mut Tables) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = guard.clone();
        let out = op(&mut next)?;
        self.backend.save_tables(&next)?;
        *guard = next;
        Ok(out)
    }

    pub fn create_account(
        &self,
        name: &str,
        email: &str,
        account_number: &str,
    ) -> Result<Account, StoreError> {
        let canonical = account_number::canonicalize(account_number)?;
        self.write(|tables| {
            if number_in_use(tables, &canonical) {
                return Err(StoreError::DuplicateAccount);
            }
            let account = Account {
                id: tables.next_account_id,
                account_number: canonical,
                name: name.to_string(),
                email: email.to_string(),
                created_at: Utc::now(),
                last_login: None,
                is_active: true,
            };
            tables.next_account_id += 1;
            tables.accounts.push(account.clone());
            Ok(account)
        })
    }

    /// Matches grouped and bare spellings of the number.
    pub fn find_account(&self, account_number: &str) -> Result<Account, StoreError> {
        self.read(|tables| find_active(tables, account_number).cloned())?
    }

    /// Look the account up and stamp `last_login`. Failing to persist the
    /// stamp is logged and does not fail the sign-in.
    pub fn sign_in(&self, account_number: &str) -> Result<Account, StoreError> {
        let mut guard = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let account = find_active(&guard, account_number)?.clone();

        let mut next = guard.clone();
        let now = Utc::now();
        if let Some(row) = next.accounts.iter_mut().find(|a| a.id == account.id) {
            row.last_login = Some(now);
        }
        match self.backend.save_tables(&next) {
            Ok(()) => {
                *guard = next;
                Ok(Account {
                    last_login: Some(now),
                    ..account
                })
            }
            Err(err) => {
                warn!(account_id = account.id, "failed to update last login: {err}");
                Ok(account)
            }
        }
    }

    /// Draw candidates from `generator` until one is not held by an active
    /// account. Gives up after exactly [`MAX_GENERATION_ATTEMPTS`] draws.
    pub fn generate_unique_account_number<F>(&self, mut generator: F) -> Result<String, StoreError>
    where
        F: FnMut() -> String,
    {
        self.read(|tables| {
            for _ in 0..MAX_GENERATION_ATTEMPTS {
                let candidate = generator();
                if !number_in_use(tables, &candidate) {
                    return Ok(candidate);
                }
            }
            Err(StoreError::GenerationExhausted {
                attempts: MAX_GENERATION_ATTEMPTS,
            })
        })?
    }

    pub fn account_count(&self) -> Result<usize, StoreError> {
        self.read(|tables| tables.accounts.iter().filter(|a| a.is_active).count())
    }

    pub fn deactivate_account(&self, account_id: AccountId) -> Result<(), StoreError> {
        self.write(|tables| {
            let account = tables
                .accounts
                .iter_mut()
                .find(|a| a.id == account_id)
                .ok_or(StoreError::AccountNotFound)?;
            account.is_active = false;
            Ok(())
        })
    }

    /// Open a session for the account. Any session the account still has
    /// open is closed first, so at most one is open per account.
    pub fn start_session(&self, account_id: AccountId) -> Result<SessionId, StoreError> {
        self.write(|tables| {
            ensure_account(tables, account_id)?;
            let now = Utc::now();
            for session in tables
                .account_sessions
                .iter_mut()
                .filter(|s| s.account_id == account_id && s.is_open())
            {
                debug!(session_id = session.id, "closing stale open session");
                session.close(now);
            }

            let id = tables.next_session_id;
            tables.next_session_id += 1;
            tables.account_sessions.push(Session {
                id,
                account_id,
                start: now,
                end: None,
                duration_seconds: None,
            });
            Ok(id)
        })
    }

    pub fn end_session(&self, session_id: SessionId) -> Result<(), StoreError> {
        self.write(|tables| {
            let session = tables
                .account_sessions
                .iter_mut()
                .find(|s| s.id == session_id)
                .ok_or(StoreError::SessionNotFound(session_id))?;
            if !session.is_open() {
                return Err(StoreError::SessionClosed(session_id));
            }
            session.close(Utc::now());
            Ok(())
        })
    }

    /// Upsert: completing the same lesson again only refreshes `completed_at`.
    pub fn save_progress(
        &self,
        account_id: AccountId,
        module_id: &str,
        lesson_id: &str,
    ) -> Result<(), StoreError> {
        self.write(|tables| {
            ensure_account(tables, account_id)?;
            let now = Utc::now();
            match tables.account_progress.iter_mut().find(|p| {
                p.account_id == account_id && p.module_id == module_id && p.lesson_id == lesson_id
            }) {
                Some(row) => row.completed_at = now,
                None => tables.account_progress.push(Progress {
                    account_id,
                    module_id: module_id.to_string(),
                    lesson_id: lesson_id.to_string(),
                    completed_at: now,
                }),
            }
            Ok(())
        })
    }

    /// Completed lessons for the account, newest first.
    pub fn progress(&self, account_id: AccountId) -> Result<Vec<Progress>, StoreError> {
        self.read(|tables| {
            let mut rows: Vec<Progress> = tables
                .account_progress
                .iter()
                .filter(|p| p.account_id == account_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
            rows
        })
    }

    /// Returns false when the account already holds the achievement.
    pub fn award_achievement(
        &self,
        account_id: AccountId,
        achievement_id: &str,
    ) -> Result<bool, StoreError> {
        let held = self.read(|tables| {
            tables
                .account_achievements
                .iter()
                .any(|a| a.account_id == account_id && a.achievement_id == achievement_id)
        })?;
        if held {
            return Ok(false);
        }
        self.write(|tables| {
            ensure_account(tables, account_id)?;
            if tables
                .account_achievements
                .iter()
                .any(|a| a.account_id == account_id && a.achievement_id == achievement_id)
            {
                return Ok(false);
            }
            tables.account_achievements.push(Achievement {
                account_id,
                achievement_id: achievement_id.to_string(),
                earned_at: Utc::now(),
            });
            Ok(true)
        })
    }

    pub fn get_stats(&self, account_id: AccountId) -> Result<AccountStats, StoreError> {
        self.read(|tables| stats_at(tables, account_id, Utc::now()))
    }

    #[cfg(test)]
    pub(crate) fn poison_lock(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.tables.write();
            panic!("panicked while holding the store lock");
        }));
    }
}

fn find_active<'a>(tables: &'a Tables, account_number: &str) -> Result<&'a Account, StoreError> {
    tables
        .accounts
        .iter()
        .find(|a| a.is_active && account_number::same_number(&a.account_number, account_number))
        .ok_or(StoreError::AccountNotFound)
}

fn number_in_use(tables: &Tables, account_number: &str) -> bool {
    find_active(tables, account_number).is_ok()
}

fn ensure_account(tables: &Tables, account_id: AccountId) -> Result<(), StoreError> {
    if tables.accounts.iter().any(|a| a.id == account_id) {
        Ok(())
    } else {
        Err(StoreError::AccountNotFound)
    }
}

fn stats_at(tables: &Tables, account_id: AccountId, now: DateTime<Utc>) -> AccountStats {
    let lessons_completed = tables
        .account_progress
        .iter()
        .filter(|p| p.account_id == account_id)
        .count();

    let total_time_seconds = tables
        .account_sessions
        .iter()
        .filter(|s| s.account_id == account_id)
        .filter_map(|s| s.duration_seconds)
        .sum();

    let achievement_count = tables
        .account_achievements
        .iter()
        .filter(|a| a.account_id == account_id)
        .count();

    let window_start = now
        .date_naive()
        .checked_sub_days(Days::new(STREAK_WINDOW_DAYS))
        .unwrap_or(now.date_naive());
    let active_days: HashSet<_> = tables
        .account_sessions
        .iter()
        .filter(|s| s.account_id == account_id)
        .map(|s| s.start.date_naive())
        .filter(|day| *day >= window_start)
        .collect();

    AccountStats {
        lessons_completed,
        total_time_seconds,
        achievement_count,
        current_streak: active_days.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, AccountStore) {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::open(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn create_and_find_account() {
        let (_dir, store) = make_test_store();
        let created = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        assert_eq!(created.account_number, "1111 2222 3333 4444");
        assert!(created.is_active);

        let found = store.find_account("1111 2222 3333 4444").unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(store.account_count().unwrap(), 1);
    }

    #[test]
    fn bare_number_is_stored_grouped_and_found_both_ways() {
        let (_dir, store) = make_test_store();
        store
            .create_account("Ann", "a@b.com", "1234567890123456")
            .unwrap();

        let grouped = store.find_account("1234 5678 9012 3456").unwrap();
        assert_eq!(grouped.account_number, "1234 5678 9012 3456");
        assert!(store.find_account("1234567890123456").is_ok());
    }

    #[test]
    fn grouped_number_is_found_by_bare_lookup() {
        let (_dir, store) = make_test_store();
        store
            .create_account("Ann", "a@b.com", "1234 5678 9012 3456")
            .unwrap();
        assert!(store.find_account("1234567890123456").is_ok());
    }

    #[test]
    fn duplicate_number_is_rejected_without_changing_count() {
        let (_dir, store) = make_test_store();
        store
            .create_account("Ann", "a@b.com", "1234 5678 9012 3456")
            .unwrap();

        let err = store
            .create_account("Bob", "b@c.com", "1234567890123456")
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAccount));
        assert_eq!(store.account_count().unwrap(), 1);
    }

    #[test]
    fn malformed_number_is_rejected() {
        let (_dir, store) = make_test_store();
        let err = store.create_account("Ann", "a@b.com", "12345").unwrap_err();
        assert!(matches!(err, StoreError::InvalidAccountNumber(_)));
        assert_eq!(store.account_count().unwrap(), 0);
    }

    #[test]
    fn unknown_number_is_not_found() {
        let (_dir, store) = make_test_store();
        let err = store.find_account("1111222233334444").unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound));
        let err = store.sign_in("1111222233334444").unwrap_err();
        assert!(matches!(err, StoreError::AccountNotFound));
    }

    #[test]
    fn sign_in_stamps_last_login() {
        let (_dir, store) = make_test_store();
        store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        let account = store.sign_in("1111222233334444").unwrap();
        assert!(account.last_login.is_some());
        assert!(store.find_account("1111222233334444").unwrap().last_login.is_some());
    }

    #[test]
    fn deactivated_account_cannot_sign_in() {
        let (_dir, store) = make_test_store();
        let account = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        store.deactivate_account(account.id).unwrap();
        assert!(matches!(
            store.sign_in("1111 2222 3333 4444"),
            Err(StoreError::AccountNotFound)
        ));
        assert_eq!(store.account_count().unwrap(), 0);
    }

    #[test]
    fn generation_gives_up_after_exactly_100_attempts() {
        let (_dir, store) = make_test_store();
        store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();

        let calls = Cell::new(0);
        let result = store.generate_unique_account_number(|| {
            calls.set(calls.get() + 1);
            "1111 2222 3333 4444".to_string()
        });
        assert!(matches!(
            result,
            Err(StoreError::GenerationExhausted { attempts: 100 })
        ));
        assert_eq!(calls.get(), 100);
    }

    #[test]
    fn generation_returns_first_free_candidate() {
        let (_dir, store) = make_test_store();
        store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();

        let mut candidates = vec!["5555 6666 7777 8888", "1111222233334444"];
        let number = store
            .generate_unique_account_number(|| candidates.pop().unwrap().to_string())
            .unwrap();
        assert_eq!(number, "5555 6666 7777 8888");
    }

    #[test]
    fn save_progress_is_an_upsert() {
        let (_dir, store) = make_test_store();
        let account = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();

        store.save_progress(account.id, "basics", "basics-1").unwrap();
        let first = store.progress(account.id).unwrap()[0].completed_at;
        store.save_progress(account.id, "basics", "basics-1").unwrap();

        let rows = store.progress(account.id).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].completed_at >= first);
    }

    #[test]
    fn progress_for_unknown_account_is_rejected() {
        let (_dir, store) = make_test_store();
        assert!(matches!(
            store.save_progress(42, "basics", "basics-1"),
            Err(StoreError::AccountNotFound)
        ));
    }

    #[test]
    fn starting_a_session_closes_the_previous_one() {
        let (_dir, store) = make_test_store();
        let account = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();

        let first = store.start_session(account.id).unwrap();
        let second = store.start_session(account.id).unwrap();
        assert_ne!(first, second);

        assert!(matches!(
            store.end_session(first),
            Err(StoreError::SessionClosed(id)) if id == first
        ));
        store.end_session(second).unwrap();
    }

    #[test]
    fn session_closes_exactly_once() {
        let (_dir, store) = make_test_store();
        let account = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        let id = store.start_session(account.id).unwrap();
        store.end_session(id).unwrap();
        assert!(matches!(store.end_session(id), Err(StoreError::SessionClosed(_))));
        assert!(matches!(
            store.end_session(999),
            Err(StoreError::SessionNotFound(999))
        ));
    }

    #[test]
    fn achievements_are_unique_per_account() {
        let (_dir, store) = make_test_store();
        let account = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        assert!(store.award_achievement(account.id, "module:basics").unwrap());
        assert!(!store.award_achievement(account.id, "module:basics").unwrap());
        assert_eq!(store.get_stats(account.id).unwrap().achievement_count, 1);
    }

    #[test]
    fn stats_aggregate_each_table() {
        let (_dir, store) = make_test_store();
        let account = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        store.save_progress(account.id, "basics", "basics-1").unwrap();
        store.save_progress(account.id, "basics", "basics-2").unwrap();
        let session = store.start_session(account.id).unwrap();
        store.end_session(session).unwrap();

        let stats = store.get_stats(account.id).unwrap();
        assert_eq!(stats.lessons_completed, 2);
        assert_eq!(stats.current_streak, 1);
        assert!(stats.total_time_seconds >= 0);
    }

    #[test]
    fn streak_counts_distinct_days_in_window() {
        let now = Utc::now();
        let mut tables = Tables::default();
        let mut push = |id: u64, start: DateTime<Utc>| {
            tables.account_sessions.push(Session {
                id,
                account_id: 1,
                start,
                end: Some(start + Duration::seconds(60)),
                duration_seconds: Some(60),
            });
        };
        push(1, now);
        push(2, now);
        push(3, now - Duration::days(2));
        push(4, now - Duration::days(30));

        let stats = stats_at(&tables, 1, now);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.total_time_seconds, 240);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = AccountStore::open(dir.path().to_path_buf()).unwrap();
            store
                .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
                .unwrap();
        }
        let store = AccountStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.find_account("1111222233334444").unwrap().name, "Ann");
    }

    fn block_saves(dir: &TempDir) {
        fs::create_dir(dir.path().join("powerhell.tmp")).unwrap();
    }

    #[test]
    fn failed_write_leaves_memory_and_disk_unchanged() {
        let (dir, store) = make_test_store();
        let ann = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        let on_disk = fs::read_to_string(dir.path().join("powerhell.json")).unwrap();
        block_saves(&dir);

        assert!(matches!(
            store.create_account("Bob", "b@c.com", "5555 6666 7777 8888"),
            Err(StoreError::Io(_))
        ));
        assert!(matches!(
            store.save_progress(ann.id, "basics", "basics-1"),
            Err(StoreError::Io(_))
        ));
        assert!(store.start_session(ann.id).is_err());

        assert_eq!(store.account_count().unwrap(), 1);
        assert!(matches!(
            store.find_account("5555666677778888"),
            Err(StoreError::AccountNotFound)
        ));
        assert!(store.progress(ann.id).unwrap().is_empty());
        assert_eq!(store.get_stats(ann.id).unwrap().current_streak, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("powerhell.json")).unwrap(),
            on_disk
        );
    }

    #[test]
    fn sign_in_succeeds_when_last_login_cannot_be_saved() {
        let (dir, store) = make_test_store();
        let created = store
            .create_account("Ann", "a@b.com", "1111 2222 3333 4444")
            .unwrap();
        block_saves(&dir);

        let account = store.sign_in("1111222233334444").unwrap();
        assert_eq!(account.id, created.id);
        assert!(account.last_login.is_none());
        assert!(store.find_account("1111222233334444").unwrap().last_login.is_none());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let (_dir, store) = make_test_store();
        store.poison_lock();
        assert!(matches!(
            store.sign_in("1111222233334444"),
            Err(StoreError::Poisoned)
        ));
    }
}
