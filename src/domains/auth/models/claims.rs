use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 토큰 용도
/// Which flow a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 계정 ID
    /// Account ID
    pub sub: Uuid,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// 유효 시작 시간 (Unix timestamp)
    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// 토큰 고유 ID (같은 초에 발급된 토큰도 서로 다름)
    /// Unique token id, so two tokens minted in the same second still differ
    pub jti: Uuid,

    pub typ: TokenKind,
}
