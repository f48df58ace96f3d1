use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domains::auth::models::account::{Account, Profile};
use crate::domains::auth::models::claims::Claims;
use crate::domains::auth::models::session::SessionRecord;
use crate::domains::auth::services::{CredentialHasher, JwtService};
use crate::shared::clock::Clock;
use crate::shared::database::{AccountRepository, SessionRepository};
use crate::shared::errors::{AuthError, StoreError};

const MAX_USERNAME_LEN: usize = 64;
const MAX_DEVICE_ID_LEN: usize = 255;

/// 발급된 세션 (회원가입/로그인 결과)
/// Result of a successful register or login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub account: Account,
    pub access_token: String,
    pub refresh_token: String,
}

/// 세션 복원 결과 (앱 시작 시)
/// Result of restoring a session from a refresh token
#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub account: Account,
    pub profile: Profile,
    pub access_token: String,
}

// 인증 서비스
// AuthService: register / login / logout / refresh orchestration
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionRepository>,
    hasher: CredentialHasher,
    jwt_service: JwtService,
    clock: Arc<dyn Clock>,
    /// 존재하지 않는 사용자 로그인 시 검증할 더미 해시 (응답 시간 평준화)
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
        hasher: CredentialHasher,
        jwt_service: JwtService,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(Uuid::new_v4().as_bytes())?;

        Ok(Self {
            accounts,
            sessions,
            hasher,
            jwt_service,
            clock,
            dummy_hash: dummy_hash.into(),
        })
    }

    // 회원가입
    // Register: account + profile (atomic), token pair, device session
    #[instrument(skip(self, password), fields(username = %username, device_id = %device_id))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        device_id: &str,
    ) -> Result<IssuedSession, AuthError> {
        let device_id = validate_device_id(device_id)?;
        validate_credentials_input(username, password)?;

        // 1. 비밀번호 해싱
        let password_hash = self.hash_secret(password.to_string()).await?;

        // 2. 계정 + 프로필 생성 (중복은 유니크 제약으로 판단)
        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
        };
        let now = self.clock.now();

        self.accounts
            .create_with_profile(&account, now)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AuthError::UsernameTaken,
                other => AuthError::DatabaseError(format!("Failed to create account: {}", other)),
            })?;

        // 3. 토큰 발급 및 세션 저장
        let (access_token, refresh_token, record) = self.mint_session(account.id, device_id).await?;

        self.sessions
            .put(&record)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to store session: {}", e)))?;

        info!(account_id = %account.id, "Account registered");

        Ok(IssuedSession {
            account,
            access_token,
            refresh_token,
        })
    }

    // 로그인
    // Login: verify credentials, replace the device's session, stamp last_login
    #[instrument(skip(self, password), fields(username = %username, device_id = %device_id))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_id: &str,
    ) -> Result<IssuedSession, AuthError> {
        let device_id = validate_device_id(device_id)?;
        validate_credentials_input(username, password)?;

        // 1. 사용자명으로 계정 조회
        let account = self
            .accounts
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch account: {}", e)))?;

        // 2. 비밀번호 검증 (계정이 없어도 같은 비용의 검증을 수행)
        let account = match account {
            Some(account) => {
                if !self
                    .verify_secret(password.to_string(), account.password_hash.clone())
                    .await?
                {
                    warn!("Login rejected");
                    return Err(AuthError::InvalidCredentials);
                }
                account
            }
            None => {
                self.verify_secret(password.to_string(), self.dummy_hash.to_string())
                    .await?;
                warn!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // 3. 새 토큰 발급 후 기존 기기 세션 교체 + 마지막 로그인 갱신 (한 트랜잭션)
        let (access_token, refresh_token, record) = self.mint_session(account.id, device_id).await?;

        self.sessions
            .replace_on_login(&record, self.clock.now())
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to store session: {}", e)))?;

        info!(account_id = %account.id, "Login successful");

        Ok(IssuedSession {
            account,
            access_token,
            refresh_token,
        })
    }

    /// 로그아웃 - 현재 기기의 세션 삭제 (이미 로그아웃된 경우도 성공)
    /// Logout - delete this device's session; idempotent
    #[instrument(skip(self))]
    pub async fn logout(&self, account_id: Uuid, device_id: &str) -> Result<(), AuthError> {
        let device_id = validate_device_id(device_id)?;

        self.sessions
            .delete(account_id, device_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to delete session: {}", e)))?;

        info!("Logged out");
        Ok(())
    }

    /// 모든 기기에서 로그아웃
    /// Revoke every session of the account
    #[instrument(skip(self))]
    pub async fn logout_all_devices(&self, account_id: Uuid) -> Result<u64, AuthError> {
        let removed = self
            .sessions
            .delete_all_for_account(account_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to delete sessions: {}", e)))?;

        info!(removed, "Logged out from all devices");
        Ok(removed)
    }

    /// Refresh Token 검증 및 새 Access Token 발급
    /// Verify refresh token against the device session and issue a new access token
    ///
    /// Refresh Token은 재사용됩니다 (만료 또는 무효화 전까지).
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, device_id: &str, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.verify_refresh(device_id, refresh_token).await?;

        let access_token = self.jwt_service.issue_access_token(claims.sub)?;
        info!(account_id = %claims.sub, "Access token refreshed");

        Ok(access_token)
    }

    /// 세션 복원: 갱신과 같은 검증 후 계정/프로필 함께 반환
    /// Restore a session: same checks as `refresh`, plus account and profile
    #[instrument(skip(self, refresh_token))]
    pub async fn restore_session(
        &self,
        device_id: &str,
        refresh_token: &str,
    ) -> Result<RestoredSession, AuthError> {
        let claims = self.verify_refresh(device_id, refresh_token).await?;

        let account = self.get_account(claims.sub).await.map_err(|e| match e {
            // 토큰은 유효하지만 계정이 삭제됨
            AuthError::AccountNotFound => AuthError::SessionRevoked,
            other => other,
        })?;
        let profile = self.get_profile(account.id).await?;
        let access_token = self.jwt_service.issue_access_token(account.id)?;

        Ok(RestoredSession {
            account,
            profile,
            access_token,
        })
    }

    pub async fn get_account(&self, account_id: Uuid) -> Result<Account, AuthError> {
        self.accounts
            .find_by_id(account_id)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch account: {}", e)))?
            .ok_or(AuthError::AccountNotFound)
    }

    pub async fn get_profile(&self, account_id: Uuid) -> Result<Profile, AuthError> {
        self.accounts.get_profile(account_id).await.map_err(|e| match e {
            StoreError::NotFound => AuthError::AccountNotFound,
            other => AuthError::DatabaseError(format!("Failed to fetch profile: {}", other)),
        })
    }

    /// 공개 프로필 조회 (인증 불필요)
    pub async fn get_public_profile(&self, username: &str) -> Result<Profile, AuthError> {
        self.accounts
            .get_profile_by_username(username)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::AccountNotFound,
                other => AuthError::DatabaseError(format!("Failed to fetch profile: {}", other)),
            })
    }

    pub async fn update_profile(
        &self,
        account_id: Uuid,
        biodata: &str,
        email: Option<&str>,
    ) -> Result<Profile, AuthError> {
        self.accounts
            .update_profile(account_id, biodata, email)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::AccountNotFound,
                other => AuthError::DatabaseError(format!("Failed to update profile: {}", other)),
            })?;

        self.get_profile(account_id).await
    }

    /// 비밀번호 변경 (기존 비밀번호 확인 후 재해싱)
    /// Change password: verify the old one, store a fresh hash of the new one
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        account_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::BadRequest("new_password must not be empty".to_string()));
        }

        let account = self.get_account(account_id).await?;
        if !self
            .verify_secret(old_password.to_string(), account.password_hash)
            .await?
        {
            return Err(AuthError::PasswordMismatch);
        }

        let new_hash = self.hash_secret(new_password.to_string()).await?;
        self.accounts
            .update_password_hash(account_id, &new_hash)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to update password: {}", e)))?;

        info!("Password changed");
        Ok(())
    }

    // Refresh Token 서명/만료 검증 + 저장된 해시와 대조
    async fn verify_refresh(&self, device_id: &str, refresh_token: &str) -> Result<Claims, AuthError> {
        let device_id = validate_device_id(device_id)?;
        if refresh_token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        // 1. 토큰 자체 검증
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;

        // 2. 서버 측 세션 존재 여부 (로그아웃/만료 정리/새 로그인 시 없음)
        let stored_hash = match self.sessions.get_hash(claims.sub, device_id).await {
            Ok(hash) => hash,
            Err(StoreError::NotFound) => {
                warn!(account_id = %claims.sub, "No session for device");
                return Err(AuthError::SessionRevoked);
            }
            Err(e) => {
                return Err(AuthError::DatabaseError(format!("Failed to fetch session: {}", e)));
            }
        };

        // 3. 저장된 해시와 대조 (같은 기기의 새 로그인으로 교체된 경우 불일치)
        if !self.verify_secret(refresh_token.to_string(), stored_hash).await? {
            warn!(account_id = %claims.sub, "Refresh token does not match stored session");
            return Err(AuthError::SessionRevoked);
        }

        Ok(claims)
    }

    async fn mint_session(
        &self,
        account_id: Uuid,
        device_id: &str,
    ) -> Result<(String, String, SessionRecord), AuthError> {
        let access_token = self.jwt_service.issue_access_token(account_id)?;
        let refresh_token = self.jwt_service.issue_refresh_token(account_id)?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.jwt_service.refresh_ttl())
            .ok_or_else(|| AuthError::Internal("Session expiry out of range".to_string()))?;
        let token_hash = self.hash_secret(refresh_token.clone()).await?;

        let record = SessionRecord {
            account_id,
            device_id: device_id.to_string(),
            token_hash,
            expires_at,
        };

        Ok((access_token, refresh_token, record))
    }

    // 해싱은 CPU/메모리를 많이 쓰므로 blocking 풀에서 실행
    async fn hash_secret(&self, secret: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(secret.as_bytes()))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_secret(&self, secret: String, encoded_hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(secret.as_bytes(), &encoded_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Hash verification task failed: {}", e)))
    }
}

fn validate_device_id(device_id: &str) -> Result<&str, AuthError> {
    let device_id = device_id.trim();
    if device_id.is_empty() {
        return Err(AuthError::MissingDeviceId);
    }
    if device_id.len() > MAX_DEVICE_ID_LEN {
        return Err(AuthError::BadRequest("device id too long".to_string()));
    }
    Ok(device_id)
}

fn validate_credentials_input(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::BadRequest(
            "username and password are required".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuthError::BadRequest("username too long".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_validation() {
        assert!(matches!(validate_device_id(""), Err(AuthError::MissingDeviceId)));
        assert!(matches!(validate_device_id("   "), Err(AuthError::MissingDeviceId)));
        assert_eq!(validate_device_id(" dev1 ").unwrap(), "dev1");
        assert!(matches!(
            validate_device_id(&"x".repeat(MAX_DEVICE_ID_LEN + 1)),
            Err(AuthError::BadRequest(_))
        ));
    }

    #[test]
    fn test_credentials_input_validation() {
        assert!(validate_credentials_input("alice", "pw123").is_ok());
        assert!(matches!(validate_credentials_input("", "pw"), Err(AuthError::BadRequest(_))));
        assert!(matches!(validate_credentials_input("alice", ""), Err(AuthError::BadRequest(_))));
        assert!(matches!(
            validate_credentials_input(&"a".repeat(MAX_USERNAME_LEN + 1), "pw"),
            Err(AuthError::BadRequest(_))
        ));
    }
}
