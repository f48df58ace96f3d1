use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::instrument;
use uuid::Uuid;

use crate::domains::auth::models::session::SessionRecord;
use crate::shared::database::Database;
use crate::shared::errors::StoreError;

/// 세션 저장소 (기기별 Refresh Token 해시)
/// Session store: one refresh-token hash per (account, device)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 세션 저장 (같은 기기의 기존 세션은 원자적으로 교체)
    /// Upsert; an existing record for the same device is replaced atomically
    async fn put(&self, record: &SessionRecord) -> Result<(), StoreError>;

    /// 로그인 시 세션 교체 + 마지막 로그인 시각 갱신 (하나의 트랜잭션)
    /// Replace the device's session and stamp `last_login` as one unit
    async fn replace_on_login(
        &self,
        record: &SessionRecord,
        login_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// 저장된 해시 조회 (없으면 `NotFound`)
    async fn get_hash(&self, account_id: Uuid, device_id: &str) -> Result<String, StoreError>;

    /// 세션 삭제 (없어도 성공)
    /// Idempotent delete
    async fn delete(&self, account_id: Uuid, device_id: &str) -> Result<(), StoreError>;

    /// 계정의 모든 세션 삭제 (모든 기기에서 로그아웃)
    /// Delete every session of an account (logout from all devices)
    async fn delete_all_for_account(&self, account_id: Uuid) -> Result<u64, StoreError>;

    /// 만료된 세션 삭제 (정리 작업)
    /// Delete sessions with `expires_at < now`
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

/// PostgreSQL 세션 저장소
pub struct PgSessionRepository {
    db: Database,
}

impl PgSessionRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

// (account_id, device_id) 유니크 제약을 이용한 upsert
const UPSERT_SESSION: &str = r#"
    INSERT INTO sessions (account_id, device_id, token_hash, expires_at)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (account_id, device_id)
    DO UPDATE SET token_hash = EXCLUDED.token_hash,
                  expires_at = EXCLUDED.expires_at,
                  created_at = NOW()
"#;

#[async_trait]
impl SessionRepository for PgSessionRepository {
    #[instrument(skip(self, record), fields(account_id = %record.account_id, device_id = %record.device_id))]
    async fn put(&self, record: &SessionRecord) -> Result<(), StoreError> {
        sqlx::query(UPSERT_SESSION)
            .bind(record.account_id)
            .bind(&record.device_id)
            .bind(&record.token_hash)
            .bind(record.expires_at)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    #[instrument(skip(self, record), fields(account_id = %record.account_id, device_id = %record.device_id))]
    async fn replace_on_login(
        &self,
        record: &SessionRecord,
        login_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let record = record.clone();

        self.db
            .with_transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query(UPSERT_SESSION)
                        .bind(record.account_id)
                        .bind(&record.device_id)
                        .bind(&record.token_hash)
                        .bind(record.expires_at)
                        .execute(&mut **tx)
                        .await?;

                    let updated = sqlx::query(
                        r#"
                        UPDATE user_profiles
                        SET last_login = $1
                        WHERE account_id = $2
                        "#,
                    )
                    .bind(login_at)
                    .bind(record.account_id)
                    .execute(&mut **tx)
                    .await?;

                    // 프로필 없는 계정은 불변식 위반 → 세션도 남기지 않음
                    if updated.rows_affected() == 0 {
                        return Err(StoreError::NotFound);
                    }

                    Ok(())
                })
            })
            .await
    }

    async fn get_hash(&self, account_id: Uuid, device_id: &str) -> Result<String, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT token_hash
            FROM sessions
            WHERE account_id = $1 AND device_id = $2
            "#,
        )
        .bind(account_id)
        .bind(device_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row.get("token_hash"))
    }

    #[instrument(skip(self))]
    async fn delete(&self, account_id: Uuid, device_id: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE account_id = $1 AND device_id = $2
            "#,
        )
        .bind(account_id)
        .bind(device_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all_for_account(&self, account_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < $1
            "#,
        )
        .bind(now)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected())
    }
}
