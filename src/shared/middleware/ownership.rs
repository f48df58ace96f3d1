use uuid::Uuid;

use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::AuthenticatedUser;

/// 소유권 검사 대상 리소스
/// Resources that can only be modified by their owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedResource {
    Thread { id: Uuid, author_id: Uuid },
    Comment { id: Uuid, author_id: Uuid },
    Profile { account_id: Uuid },
}

impl OwnedResource {
    pub fn owner_id(&self) -> Uuid {
        match self {
            OwnedResource::Thread { author_id, .. } | OwnedResource::Comment { author_id, .. } => {
                *author_id
            }
            OwnedResource::Profile { account_id } => *account_id,
        }
    }
}

/// 리소스 소유 여부
pub fn owner_of(resource: &OwnedResource, account_id: Uuid) -> bool {
    resource.owner_id() == account_id
}

/// 인증된 사용자가 소유자가 아니면 403
/// Reject with `NotOwner` unless the authenticated user owns the resource
pub fn ensure_owner(resource: &OwnedResource, user: &AuthenticatedUser) -> Result<(), AuthError> {
    if owner_of(resource, user.account_id) {
        Ok(())
    } else {
        tracing::warn!(
            account_id = %user.account_id,
            owner_id = %resource.owner_id(),
            "Ownership check failed"
        );
        Err(AuthError::NotOwner)
    }
}
