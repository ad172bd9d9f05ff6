//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::Tenant;

/// Closed role set. The first user of a tenant is always
/// [`Role::Admin`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Leader,
    Member,
}

/// External identity provider a user can sign in through. Each
/// provider gets one id slot on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProvider {
    Google,
    Microsoft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Globally unique — identity lookup is not partitioned by tenant.
    pub email: String,
    pub name: String,
    /// Argon2id PHC digest. Absent for accounts created via a
    /// federated credential that never set a password. Never exposed
    /// through any view model.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub microsoft_id: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The stored provider id for `provider`, if one is linked.
    pub fn provider_id(&self, provider: IdentityProvider) -> Option<&str> {
        match provider {
            IdentityProvider::Google => self.google_id.as_deref(),
            IdentityProvider::Microsoft => self.microsoft_id.as_deref(),
        }
    }
}

/// Fields required to create a new user. The owning tenant is
/// assigned by the store during the paired tenant+user create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    /// Already-hashed credential, or `None` for federated-only
    /// accounts. Hashing is the identity service's job.
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub microsoft_id: Option<String>,
    pub role: Role,
}

/// A user joined with its owning tenant. Identity lookups always
/// resolve both.
#[derive(Debug, Clone)]
pub struct UserWithTenant {
    pub user: User,
    pub tenant: Tenant,
}
