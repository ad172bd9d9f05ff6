//! Stateless access guards, run after authentication.

use stagedoor_core::error::{StagedoorError, StagedoorResult};
use stagedoor_core::models::identity::AuthenticatedIdentity;
use stagedoor_core::models::user::Role;
use uuid::Uuid;

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Admin => "ADMIN",
        Role::Leader => "LEADER",
        Role::Member => "MEMBER",
    }
}

/// Reject unless an identity is attached and its role is in `allowed`.
///
/// A missing identity means the authenticator never ran on this call;
/// that surfaces as the unauthorized class, not as forbidden.
pub fn require_role(
    identity: Option<&AuthenticatedIdentity>,
    allowed: &[Role],
) -> StagedoorResult<()> {
    let identity = identity.ok_or(StagedoorError::MissingIdentity)?;

    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        let roles: Vec<&str> = allowed.iter().map(|r| role_name(*r)).collect();
        Err(StagedoorError::Forbidden {
            reason: format!("requires one of: {}", roles.join(", ")),
        })
    }
}

/// Reject unless the identity carries a tenant, returning the tenant
/// id for downstream query scoping.
///
/// A present [`AuthenticatedIdentity`] always has a tenant id, so the
/// check reduces to presence. Filtering every resource query by the
/// returned id remains each handler's job — the guard cannot verify
/// that.
pub fn require_tenant(identity: Option<&AuthenticatedIdentity>) -> StagedoorResult<Uuid> {
    match identity {
        Some(identity) => Ok(identity.tenant_id),
        None => Err(StagedoorError::Forbidden {
            reason: "tenant access required".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            user_id: Uuid::new_v4(),
            email: "user@example.com".into(),
            tenant_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn allowed_role_passes() {
        let id = identity(Role::Admin);
        assert!(require_role(Some(&id), &[Role::Admin]).is_ok());
        assert!(require_role(Some(&id), &[Role::Admin, Role::Leader]).is_ok());
    }

    #[test]
    fn disallowed_role_is_forbidden() {
        let id = identity(Role::Member);
        let err = require_role(Some(&id), &[Role::Admin, Role::Leader]).unwrap_err();
        assert!(matches!(err, StagedoorError::Forbidden { .. }));
        assert_eq!(
            err.to_string(),
            "Access denied: requires one of: ADMIN, LEADER"
        );
    }

    #[test]
    fn missing_identity_is_unauthorized() {
        let err = require_role(None, &[Role::Admin]).unwrap_err();
        assert!(matches!(err, StagedoorError::MissingIdentity));
    }

    #[test]
    fn tenant_guard_returns_the_tenant_id() {
        let id = identity(Role::Member);
        assert_eq!(require_tenant(Some(&id)).unwrap(), id.tenant_id);
    }

    #[test]
    fn tenant_guard_without_identity_is_forbidden() {
        let err = require_tenant(None).unwrap_err();
        assert!(matches!(err, StagedoorError::Forbidden { .. }));
    }
}
