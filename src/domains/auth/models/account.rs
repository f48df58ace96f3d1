use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 계정 모델 (DB 저장용)
/// Account model (as stored)
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// 프로필 모델
/// Profile created alongside every account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub account_id: Uuid,
    pub biodata: String,
    pub email: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(account_id: Uuid, creation_date: DateTime<Utc>) -> Self {
        Self {
            account_id,
            biodata: String::new(),
            email: None,
            creation_date,
            last_login: None,
        }
    }
}

/// 계정 응답 모델 (비밀번호 해시 제외)
/// Account response (password hash omitted)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = AccountResponse)]
pub struct AccountResponse {
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
        }
    }
}
