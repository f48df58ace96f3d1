use thiserror::Error;

/// 토큰 검증 실패 종류
/// Why a token failed verification
///
/// 호출자는 `Expired`만 갱신 흐름으로 보내고 나머지는 재로그인을 요구합니다.
/// Callers route `Expired` to the refresh flow; every other variant is a
/// hard reject that requires a fresh login.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// 형식이 잘못된 토큰
    #[error("Malformed token")]
    Malformed,

    /// 서명 또는 알고리즘 불일치
    /// Signature or algorithm mismatch
    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    /// Access/Refresh 용도가 맞지 않음
    /// Access token presented where a refresh token was expected, or the reverse
    #[error("Wrong token type")]
    WrongKind,

    /// 서명 생성 실패
    /// Failed to sign a token
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// 갱신으로 복구 가능한지 여부
    /// Whether the client may recover by calling the refresh endpoint
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }
}
