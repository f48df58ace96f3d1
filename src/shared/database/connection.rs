use anyhow::{Context, Result};
use futures_util::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::shared::config::AppConfig;
use crate::shared::errors::StoreError;

// 데이터베이스 연결 풀
// Database connection pool for PostgreSQL
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    // 데이터베이스 연결 생성
    // Create database connection
    pub async fn connect(db_url: &str, config: &AppConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(config.database_acquire_timeout)
            .connect(db_url)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    // 연결 풀 반환
    // Get connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // 마이그레이션 실행
    // Run migrations from migrations/ folder
    pub async fn initialize(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(self.pool())
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// 트랜잭션 범위 실행
    /// Run `body` inside a transaction
    ///
    /// 본문이 에러를 반환하면 롤백, 성공하면 커밋합니다. 본문이 패닉하면
    /// 트랜잭션이 커밋 없이 drop되어 sqlx가 롤백합니다.
    ///
    /// ```ignore
    /// db.with_transaction(move |tx| Box::pin(async move {
    ///     sqlx::query("DELETE FROM sessions WHERE account_id = $1")
    ///         .bind(account_id)
    ///         .execute(&mut **tx)
    ///         .await?;
    ///     Ok(())
    /// })).await?;
    /// ```
    pub async fn with_transaction<T, F>(&self, body: F) -> Result<T, StoreError>
    where
        T: Send,
        F: for<'c> FnOnce(
                &'c mut Transaction<'static, Postgres>,
            ) -> BoxFuture<'c, Result<T, StoreError>>
            + Send,
    {
        let mut tx = self.pool.begin().await?;

        match body(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }
}
