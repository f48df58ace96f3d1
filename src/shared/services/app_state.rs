use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domains::auth::services::state::AuthState;
use crate::shared::clock::Clock;
use crate::shared::config::AppConfig;
use crate::shared::database::{
    AccountRepository, Database, InMemoryAuthStore, PgAccountRepository, PgSessionRepository,
    SessionRepository,
};
use crate::shared::utils::CookieConfig;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 설정과 저장소는 main에서 만들어 주입합니다. 전역 상태는 없습니다.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_state: AuthState,
    /// 세션 정리 스케줄러가 공유하는 저장소
    /// Session store handle, shared with the sweeper
    pub sessions: Arc<dyn SessionRepository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create AppState from injected repositories
    /// 주입된 저장소로 AppState 생성
    pub fn new(
        config: AppConfig,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let auth_state = AuthState::new(&config, accounts, sessions.clone(), clock.clone())
            .context("Failed to initialize auth services")?;

        Ok(Self {
            config: Arc::new(config),
            auth_state,
            sessions,
            clock,
        })
    }

    /// PostgreSQL 저장소로 생성
    pub fn with_database(config: AppConfig, db: Database, clock: Arc<dyn Clock>) -> Result<Self> {
        let accounts = Arc::new(PgAccountRepository::new(db.clone()));
        let sessions = Arc::new(PgSessionRepository::new(db));
        Self::new(config, accounts, sessions, clock)
    }

    /// 인메모리 저장소로 생성 (DATABASE_URL 미설정 시)
    pub fn in_memory(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = Arc::new(InMemoryAuthStore::new());
        Self::new(config, store.clone(), store, clock)
    }

    /// Refresh Token 쿠키 속성
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig::new(
            self.config.secure_cookie,
            self.auth_state.jwt_service.refresh_ttl(),
        )
    }
}
