// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;

use crate::domains::auth::services::{AuthService, CredentialHasher, JwtService};
use crate::shared::clock::Clock;
use crate::shared::config::AppConfig;
use crate::shared::database::{AccountRepository, SessionRepository};
use crate::shared::errors::AuthError;

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
}

impl AuthState {
    /// Create AuthState with repositories, config and clock
    /// AuthState 생성 (저장소, 설정, 시계 필요)
    pub fn new(
        config: &AppConfig,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let hasher = CredentialHasher::new(config.hashing)
            .map_err(|e| AuthError::Internal(format!("Invalid hashing parameters: {}", e)))?;
        let jwt_service = JwtService::new(&config.jwt, clock.clone());
        let auth_service =
            AuthService::new(accounts, sessions, hasher, jwt_service.clone(), clock)?;

        Ok(Self {
            auth_service,
            jwt_service,
        })
    }
}
