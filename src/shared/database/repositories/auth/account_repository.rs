use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;
use uuid::Uuid;

use crate::domains::auth::models::account::{Account, Profile};
use crate::shared::database::Database;
use crate::shared::errors::StoreError;

/// 계정/프로필 저장소
/// Account and profile persistence
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// 계정과 빈 프로필을 하나의 트랜잭션으로 생성
    /// Create the account and its empty profile atomically
    ///
    /// 사용자명 중복은 유니크 제약으로 감지되어 `UniqueViolation`으로 반환됩니다.
    async fn create_with_profile(
        &self,
        account: &Account,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn get_profile(&self, account_id: Uuid) -> Result<Profile, StoreError>;

    /// 사용자명으로 공개 프로필 조회
    async fn get_profile_by_username(&self, username: &str) -> Result<Profile, StoreError>;

    async fn update_profile(
        &self,
        account_id: Uuid,
        biodata: &str,
        email: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError>;
}

/// PostgreSQL 계정 저장소
pub struct PgAccountRepository {
    db: Database,
}

impl PgAccountRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn account_from_row(row: &PgRow) -> Account {
        Account {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
        }
    }

    fn profile_from_row(row: &PgRow) -> Profile {
        Profile {
            account_id: row.get("account_id"),
            biodata: row.get("biodata"),
            email: row.get("email"),
            creation_date: row.get("creation_date"),
            last_login: row.get("last_login"),
        }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self, account), fields(account_id = %account.id, username = %account.username))]
    async fn create_with_profile(
        &self,
        account: &Account,
        created_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let account = account.clone();

        self.db
            .with_transaction(move |tx| {
                Box::pin(async move {
                    sqlx::query(
                        r#"
                        INSERT INTO accounts (id, username, password_hash)
                        VALUES ($1, $2, $3)
                        "#,
                    )
                    .bind(account.id)
                    .bind(&account.username)
                    .bind(&account.password_hash)
                    .execute(&mut **tx)
                    .await?;

                    sqlx::query(
                        r#"
                        INSERT INTO user_profiles (account_id, creation_date)
                        VALUES ($1, $2)
                        "#,
                    )
                    .bind(account.id)
                    .bind(created_at)
                    .execute(&mut **tx)
                    .await?;

                    Ok(())
                })
            })
            .await
    }

    // 사용자명으로 계정 조회 (로그인용)
    // Get account by username (for login)
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::account_from_row))
    }

    // ID로 계정 조회
    // Get account by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(Self::account_from_row))
    }

    async fn get_profile(&self, account_id: Uuid) -> Result<Profile, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT account_id, biodata, email, creation_date, last_login
            FROM user_profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(Self::profile_from_row(&row))
    }

    // 프로필 + 계정 조인 (공개 프로필)
    async fn get_profile_by_username(&self, username: &str) -> Result<Profile, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT p.account_id, p.biodata, p.email, p.creation_date, p.last_login
            FROM user_profiles p
            JOIN accounts a ON a.id = p.account_id
            WHERE a.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(Self::profile_from_row(&row))
    }

    async fn update_profile(
        &self,
        account_id: Uuid,
        biodata: &str,
        email: Option<&str>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles
            SET biodata = $1, email = $2
            WHERE account_id = $3
            "#,
        )
        .bind(biodata)
        .bind(email)
        .bind(account_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $1
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
