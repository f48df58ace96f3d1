use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, HeaderValue, header, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::domains::auth::services::JwtService;
use crate::shared::errors::{AuthError, TokenError};
use crate::shared::services::AppState;

/// 거절 사유 헤더: `expired`면 갱신, `invalid`면 재로그인
/// Rejection marker: `expired` means call refresh, `invalid` means log in again
pub const ACCESS_TOKEN_STATUS_HEADER: &str = "x-access-token";

/// 인증된 사용자 정보 (JWT 토큰에서 추출)
/// Authenticated user information (extracted from JWT token)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
}

/// "Bearer <token>" 형식 파싱
/// Extract the bearer token from `Authorization`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::Token(TokenError::Malformed))?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// 요청 헤더의 Access Token 검증
/// Verify the request's access token and bind its account id
pub fn authenticate(headers: &HeaderMap, jwt_service: &JwtService) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = jwt_service.verify_access_token(token)?;

    Ok(AuthenticatedUser {
        account_id: claims.sub,
    })
}

/// 인증 실패 응답 (에러 본문 + `X-Access-Token` 표시)
/// Gatekeeper rejection
#[derive(Debug)]
pub struct AuthRejection(pub AuthError);

impl AuthRejection {
    fn token_status(&self) -> Option<&'static str> {
        match &self.0 {
            AuthError::Token(e) if e.is_expired() => Some("expired"),
            AuthError::Token(TokenError::Signing(_)) => None,
            AuthError::Token(_) => Some("invalid"),
            _ => None,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let marker = self.token_status();
        let mut response = self.0.into_response();

        if let Some(marker) = marker {
            response.headers_mut().insert(
                HeaderName::from_static(ACCESS_TOKEN_STATUS_HEADER),
                HeaderValue::from_static(marker),
            );
        }
        response
    }
}

/// AuthenticatedUser를 Axum Extractor로 구현
///
/// 사용법:
/// ```ignore
/// pub async fn get_me(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,  // <- 토큰이 유효할 때만 핸들러 실행
/// ) -> Result<...> {
///     let account_id = authenticated_user.account_id;
///     // ...
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, &state.auth_state.jwt_service).map_err(AuthRejection)
    }
}
