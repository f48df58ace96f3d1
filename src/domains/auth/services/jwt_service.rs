// src/domains/auth/services/jwt_service.rs
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::domains::auth::models::claims::{Claims, TokenKind};
use crate::shared::clock::Clock;
use crate::shared::config::JwtConfig;
use crate::shared::errors::TokenError;

/// JWT 서비스
/// JWT Service for token generation and verification
///
/// 키는 시작 시 한 번 만들어지고 이후 변경되지 않으므로 동기화 없이 공유됩니다.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            clock,
        }
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        self.refresh_ttl
    }

    /// Access Token 발급 (짧은 수명)
    /// Issue Access Token (short lifetime)
    pub fn issue_access_token(&self, account_id: Uuid) -> Result<String, TokenError> {
        self.issue(account_id, TokenKind::Access, self.access_ttl)
    }

    /// Refresh Token 발급 (긴 수명, 해시만 DB에 저장)
    /// Issue Refresh Token (long lifetime, only its hash is stored)
    pub fn issue_refresh_token(&self, account_id: Uuid) -> Result<String, TokenError> {
        self.issue(account_id, TokenKind::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        account_id: Uuid,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String, TokenError> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: account_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            typ: kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// 토큰 검증 (서명, 알고리즘, 유효 기간, 용도)
    /// Verify signature, algorithm, validity window and token kind
    ///
    /// HS256 외의 알고리즘(`none`, RS256 등)을 주장하는 토큰은 서명 검사 전에
    /// 거부됩니다. 유효 기간은 주입된 시계 기준으로 `nbf <= now <= exp`.
    pub fn parse_and_verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // 만료 검사는 주입된 시계로 직접 수행
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                _ => TokenError::Malformed,
            })?
            .claims;

        // 용도가 다르면 기간과 무관하게 거부
        if claims.typ != expected {
            return Err(TokenError::WrongKind);
        }

        let now = self.clock.now().timestamp();
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }
        if now > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.parse_and_verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.parse_and_verify(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::ManualClock;
    use chrono::Duration;

    fn service(clock: &ManualClock) -> JwtService {
        JwtService::new(&JwtConfig::new("unit-test-secret"), Arc::new(clock.clone()))
    }

    #[test]
    fn test_access_token_claims() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let account_id = Uuid::new_v4();

        let token = jwt.issue_access_token(account_id).unwrap();
        let claims = jwt.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 30);
    }

    #[test]
    fn test_refresh_token_lifetime() {
        let clock = ManualClock::default();
        let jwt = service(&clock);

        let token = jwt.issue_refresh_token(Uuid::new_v4()).unwrap();
        let claims = jwt.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, Duration::days(14).num_seconds());
    }

    #[test]
    fn test_expiry_boundary() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let token = jwt.issue_access_token(Uuid::new_v4()).unwrap();

        clock.advance(Duration::seconds(29));
        assert!(jwt.verify_access_token(&token).is_ok());

        clock.advance(Duration::seconds(2));
        assert_eq!(jwt.verify_access_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_not_yet_valid() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let token = jwt.issue_access_token(Uuid::new_v4()).unwrap();

        clock.advance(Duration::seconds(-10));
        assert_eq!(jwt.verify_access_token(&token), Err(TokenError::NotYetValid));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let account_id = Uuid::new_v4();

        let refresh = jwt.issue_refresh_token(account_id).unwrap();
        let access = jwt.issue_access_token(account_id).unwrap();

        assert_eq!(jwt.verify_access_token(&refresh), Err(TokenError::WrongKind));
        assert_eq!(jwt.verify_refresh_token(&access), Err(TokenError::WrongKind));
    }

    #[test]
    fn test_kind_checked_before_expiry() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let refresh = jwt.issue_refresh_token(Uuid::new_v4()).unwrap();

        clock.advance(Duration::days(15));

        assert_eq!(jwt.verify_refresh_token(&refresh), Err(TokenError::Expired));
        assert_eq!(jwt.verify_access_token(&refresh), Err(TokenError::WrongKind));
    }

    #[test]
    fn test_other_secret_is_bad_signature() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let other = JwtService::new(&JwtConfig::new("another-secret"), Arc::new(clock.clone()));

        let token = other.issue_access_token(Uuid::new_v4()).unwrap();
        assert_eq!(jwt.verify_access_token(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let clock = ManualClock::default();
        let jwt = service(&clock);

        for garbage in ["", "abc", "a.b.c", "Bearer xyz"] {
            assert_eq!(jwt.verify_access_token(garbage), Err(TokenError::Malformed));
        }
    }

    #[test]
    fn test_tokens_unique_within_same_second() {
        let clock = ManualClock::default();
        let jwt = service(&clock);
        let account_id = Uuid::new_v4();

        let first = jwt.issue_refresh_token(account_id).unwrap();
        let second = jwt.issue_refresh_token(account_id).unwrap();
        assert_ne!(first, second);
    }
}
