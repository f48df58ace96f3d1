use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{AccountRepository, SessionRepository};
use crate::domains::auth::models::account::{Account, Profile};
use crate::domains::auth::models::session::SessionRecord;
use crate::shared::errors::StoreError;

#[derive(Default)]
struct StoreState {
    accounts: HashMap<Uuid, Account>,
    usernames: HashMap<String, Uuid>,
    profiles: HashMap<Uuid, Profile>,
    sessions: HashMap<(Uuid, String), SessionRecord>,
}

/// 인메모리 인증 저장소 (개발/테스트용)
/// In-memory implementation of both auth repositories
///
/// DB 없이 실제와 같은 제약(사용자명 유니크, 기기당 세션 1개)을 지킵니다.
/// 모든 다중 단계 작업은 하나의 락 안에서 수행되므로 트랜잭션과 같은 효과를
/// 가집니다. 재시작하면 데이터가 사라집니다.
#[derive(Default)]
pub struct InMemoryAuthStore {
    state: Mutex<StoreState>,
    fail_session_writes: AtomicBool,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().accounts.len()
    }

    pub fn session_count(&self) -> usize {
        self.state.lock().sessions.len()
    }

    /// 특정 계정의 세션 수
    pub fn session_count_for(&self, account_id: Uuid) -> usize {
        self.state
            .lock()
            .sessions
            .keys()
            .filter(|(id, _)| *id == account_id)
            .count()
    }

    pub fn has_profile(&self, account_id: Uuid) -> bool {
        self.state.lock().profiles.contains_key(&account_id)
    }

    /// 세션 쓰기 장애 시뮬레이션
    /// Make every session write fail, to exercise partial-failure paths
    pub fn set_fail_session_writes(&self, fail: bool) {
        self.fail_session_writes.store(fail, Ordering::SeqCst);
    }

    fn check_session_writes(&self) -> Result<(), StoreError> {
        if self.fail_session_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("simulated session store outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAuthStore {
    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn create_with_profile(
        &self,
        account: &Account,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();

        if state.usernames.contains_key(&account.username) {
            debug!(username = %account.username, "Username already taken in memory");
            return Err(StoreError::UniqueViolation("accounts_username_key".to_string()));
        }
        if state.accounts.contains_key(&account.id) {
            return Err(StoreError::UniqueViolation("accounts_pkey".to_string()));
        }

        state.usernames.insert(account.username.clone(), account.id);
        state.accounts.insert(account.id, account.clone());
        state
            .profiles
            .insert(account.id, Profile::new(account.id, created_at));

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let state = self.state.lock();
        Ok(state
            .usernames
            .get(username)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.state.lock().accounts.get(&id).cloned())
    }

    async fn get_profile(&self, account_id: Uuid) -> Result<Profile, StoreError> {
        self.state
            .lock()
            .profiles
            .get(&account_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_profile_by_username(&self, username: &str) -> Result<Profile, StoreError> {
        let state = self.state.lock();
        state
            .usernames
            .get(username)
            .and_then(|id| state.profiles.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_profile(
        &self,
        account_id: Uuid,
        biodata: &str,
        email: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let profile = state
            .profiles
            .get_mut(&account_id)
            .ok_or(StoreError::NotFound)?;

        profile.biodata = biodata.to_string();
        profile.email = email.map(str::to_string);
        Ok(())
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let account = state.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryAuthStore {
    async fn put(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.check_session_writes()?;

        let mut state = self.state.lock();
        if !state.accounts.contains_key(&record.account_id) {
            // sessions.account_id 외래 키와 동일한 동작
            return Err(StoreError::Database("account does not exist".to_string()));
        }

        state.sessions.insert(
            (record.account_id, record.device_id.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn replace_on_login(
        &self,
        record: &SessionRecord,
        login_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.check_session_writes()?;

        let mut state = self.state.lock();
        let profile = state
            .profiles
            .get_mut(&record.account_id)
            .ok_or(StoreError::NotFound)?;
        profile.last_login = Some(login_at);

        state.sessions.insert(
            (record.account_id, record.device_id.clone()),
            record.clone(),
        );
        Ok(())
    }

    async fn get_hash(&self, account_id: Uuid, device_id: &str) -> Result<String, StoreError> {
        self.state
            .lock()
            .sessions
            .get(&(account_id, device_id.to_string()))
            .map(|record| record.token_hash.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, account_id: Uuid, device_id: &str) -> Result<(), StoreError> {
        self.state
            .lock()
            .sessions
            .remove(&(account_id, device_id.to_string()));
        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: Uuid) -> Result<u64, StoreError> {
        let mut state = self.state.lock();
        let before = state.sessions.len();
        state.sessions.retain(|(id, _), _| *id != account_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut state = self.state.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, record| record.expires_at >= now);

        let removed = (before - state.sessions.len()) as u64;
        debug!(removed, "Expired sessions removed from memory");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn account(username: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        }
    }

    fn session(account_id: Uuid, device_id: &str, hash: &str, expires_at: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            account_id,
            device_id: device_id.to_string(),
            token_hash: hash.to_string(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let store = InMemoryAuthStore::new();
        store.create_with_profile(&account("alice"), Utc::now()).await.unwrap();

        let result = store.create_with_profile(&account("alice"), Utc::now()).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
        assert_eq!(store.account_count(), 1);

        // 대소문자 구분
        store.create_with_profile(&account("Alice"), Utc::now()).await.unwrap();
        assert_eq!(store.account_count(), 2);
    }

    #[tokio::test]
    async fn test_put_replaces_same_device() {
        let store = InMemoryAuthStore::new();
        let alice = account("alice");
        store.create_with_profile(&alice, Utc::now()).await.unwrap();
        let expires = Utc::now() + Duration::days(14);

        store.put(&session(alice.id, "dev1", "h1", expires)).await.unwrap();
        store.put(&session(alice.id, "dev1", "h2", expires)).await.unwrap();
        store.put(&session(alice.id, "dev2", "h3", expires)).await.unwrap();

        assert_eq!(store.session_count_for(alice.id), 2);
        assert_eq!(store.get_hash(alice.id, "dev1").await.unwrap(), "h2");
        assert_eq!(store.get_hash(alice.id, "dev2").await.unwrap(), "h3");
    }

    #[tokio::test]
    async fn test_get_hash_missing_is_not_found() {
        let store = InMemoryAuthStore::new();
        let result = store.get_hash(Uuid::new_v4(), "dev1").await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryAuthStore::new();
        let alice = account("alice");
        store.create_with_profile(&alice, Utc::now()).await.unwrap();
        store
            .put(&session(alice.id, "dev1", "h1", Utc::now() + Duration::days(1)))
            .await
            .unwrap();

        store.delete(alice.id, "dev1").await.unwrap();
        store.delete(alice.id, "dev1").await.unwrap();
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = InMemoryAuthStore::new();
        let alice = account("alice");
        store.create_with_profile(&alice, Utc::now()).await.unwrap();
        let now = Utc::now();

        store.put(&session(alice.id, "old", "h1", now - Duration::hours(1))).await.unwrap();
        store.put(&session(alice.id, "new", "h2", now + Duration::hours(1))).await.unwrap();

        assert_eq!(store.sweep_expired(now).await.unwrap(), 1);
        assert!(store.get_hash(alice.id, "old").await.is_err());
        assert!(store.get_hash(alice.id, "new").await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_on_login_stamps_last_login() {
        let store = InMemoryAuthStore::new();
        let alice = account("alice");
        store.create_with_profile(&alice, Utc::now()).await.unwrap();
        let login_at = Utc::now();

        store
            .replace_on_login(&session(alice.id, "dev1", "h1", login_at + Duration::days(14)), login_at)
            .await
            .unwrap();

        let profile = store.get_profile(alice.id).await.unwrap();
        assert_eq!(profile.last_login, Some(login_at));
        assert_eq!(store.session_count_for(alice.id), 1);
    }

    #[tokio::test]
    async fn test_delete_all_for_account() {
        let store = InMemoryAuthStore::new();
        let alice = account("alice");
        let bob = account("bob");
        store.create_with_profile(&alice, Utc::now()).await.unwrap();
        store.create_with_profile(&bob, Utc::now()).await.unwrap();
        let expires = Utc::now() + Duration::days(1);

        store.put(&session(alice.id, "dev1", "h1", expires)).await.unwrap();
        store.put(&session(alice.id, "dev2", "h2", expires)).await.unwrap();
        store.put(&session(bob.id, "dev1", "h3", expires)).await.unwrap();

        assert_eq!(store.delete_all_for_account(alice.id).await.unwrap(), 2);
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_profile_by_username() {
        let store = InMemoryAuthStore::new();
        let alice = account("alice");
        store.create_with_profile(&alice, Utc::now()).await.unwrap();

        let profile = store.get_profile_by_username("alice").await.unwrap();
        assert_eq!(profile.account_id, alice.id);

        assert!(matches!(
            store.get_profile_by_username("Alice").await,
            Err(StoreError::NotFound)
        ));
    }
}
