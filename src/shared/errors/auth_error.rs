use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use super::{StoreError, TokenError};

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Device-ID 헤더 누락
    /// Device-ID header missing
    #[error("Missing device ID")]
    MissingDeviceId,

    /// 잘못된 요청 본문
    /// Malformed request input
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// 잘못된 사용자명 또는 비밀번호 (어느 쪽인지 구분하지 않음)
    /// Invalid username or password (never says which one)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// 사용자명이 이미 존재함
    /// Username already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("Authorization token missing")]
    MissingToken,

    /// 토큰 검증 실패
    /// Token failed verification
    #[error("{0}")]
    Token(#[from] TokenError),

    /// 서버 측에서 세션이 무효화됨 (로그아웃, 만료 정리, 새 로그인)
    /// Session revoked server-side (logout, sweep, superseding login)
    #[error("Session is no longer valid, please log in again")]
    SessionRevoked,

    /// 기존 비밀번호 불일치 (비밀번호 변경 시)
    /// Old password mismatch on password change
    #[error("Current password is incorrect")]
    PasswordMismatch,

    /// 다른 사용자의 리소스
    /// Resource belongs to another account
    #[error("You cannot modify this resource")]
    NotOwner,

    #[error("Account not found")]
    AccountNotFound,

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash secret: {0}")]
    PasswordHashingFailed(String),

    /// 데이터베이스 에러
    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingDeviceId | AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,
            AuthError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Token(_) => StatusCode::UNAUTHORIZED,
            AuthError::PasswordMismatch | AuthError::NotOwner => StatusCode::FORBIDDEN,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::UsernameTaken => StatusCode::CONFLICT,
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 기계가 확인할 수 있는 안정적인 에러 코드
    /// Stable machine-checkable error code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingDeviceId => "missing_device_id",
            AuthError::BadRequest(_) => "bad_request",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UsernameTaken => "username_taken",
            AuthError::MissingToken => "missing_token",
            AuthError::Token(TokenError::Expired) => "token_expired",
            AuthError::Token(TokenError::Signing(_)) => "internal",
            AuthError::Token(_) => "invalid_token",
            AuthError::SessionRevoked => "session_revoked",
            AuthError::PasswordMismatch => "password_mismatch",
            AuthError::NotOwner => "forbidden",
            AuthError::AccountNotFound => "account_not_found",
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => "internal",
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// 클라이언트가 처음부터 다시 로그인해야 하는지 여부
    /// Whether the client has to log in again from scratch
    pub fn requires_relogin(&self) -> bool {
        self.status() == StatusCode::UNAUTHORIZED
    }

    /// 클라이언트에 노출할 메시지 (내부 에러 상세는 숨김)
    /// Message shown to clients; internal details stay in the logs
    fn public_message(&self) -> String {
        if self.is_internal() {
            "An internal error has occurred".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status();
        (
            status,
            Json(json!({
                "status": status.as_u16(),
                "error": err.code(),
                "message": err.public_message(),
            })),
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // 요청 span 안에서 기록되므로 request id와 함께 남음
        if self.is_internal() {
            tracing::error!(error = %self, "Request failed with internal error");
        } else {
            tracing::warn!(error = %self, code = self.code(), "Request rejected");
        }

        let (status, body): (StatusCode, Json<serde_json::Value>) = self.into();
        (status, body).into_response()
    }
}
