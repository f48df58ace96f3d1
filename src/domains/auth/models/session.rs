use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 기기별 세션 레코드 (Refresh Token 해시 저장)
/// One device's session: the refresh token is kept only as an argon2 hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub account_id: Uuid,
    pub device_id: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
