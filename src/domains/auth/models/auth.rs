use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domains::auth::models::account::{AccountResponse, Profile};

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RegisterRequest)]
pub struct RegisterRequest {
    /// Username (unique, case-sensitive)
    /// 사용자명 (대소문자 구분)
    #[schema(example = "alice")]
    pub username: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[schema(example = "pw123")]
    pub password: String,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,

    #[schema(example = "pw123")]
    pub password: String,
}

// 회원가입/로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = AuthResponse)]
pub struct AuthResponse {
    pub account_id: Uuid,

    #[schema(example = "alice")]
    pub username: String,

    /// JWT Access Token (짧은 수명)
    /// JWT Access Token (short lifetime)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// Refresh Token (긴 수명, 해시만 DB에 저장, HttpOnly 쿠키로도 설정됨)
    /// Refresh Token (long lifetime, only its hash is stored, also set as an HttpOnly cookie)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,
}

// 토큰 갱신 요청 모델
// 쿠키가 없는 클라이언트는 본문으로 전달
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    /// Refresh Token (omit to use the Refresh-Token cookie)
    /// 리프레시 토큰 (생략 시 쿠키 사용)
    pub refresh_token: Option<String>,
}

// 토큰 갱신 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RefreshTokenResponse)]
pub struct RefreshTokenResponse {
    /// 새 Access Token
    /// New Access Token
    pub access_token: String,
}

/// 앱 시작 시 세션 복원 응답
/// Session restore response: account, profile and a fresh access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SessionRestoreResponse)]
pub struct SessionRestoreResponse {
    pub account: AccountResponse,
    pub profile: Profile,
    pub access_token: String,
    pub refresh_token: String,
}

// 비밀번호 변경 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdatePasswordRequest)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// 프로필 수정 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdateProfileRequest)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub biodata: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
