//! Request-scoped authenticated identity.

use uuid::Uuid;

use crate::models::user::{Role, UserWithTenant};

/// The identity attached to a call after successful authentication.
///
/// Rebuilt fresh on every call from a verified token plus a store
/// lookup — the store, not the token, is authoritative for role and
/// tenant. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub tenant_id: Uuid,
    pub role: Role,
}

impl From<&UserWithTenant> for AuthenticatedIdentity {
    fn from(found: &UserWithTenant) -> Self {
        Self {
            user_id: found.user.id,
            email: found.user.email.clone(),
            tenant_id: found.user.tenant_id,
            role: found.user.role,
        }
    }
}
