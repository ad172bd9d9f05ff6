//! SurrealDB implementation of [`IdentityStore`].
//!
//! Tenant+user creation runs as a single SurrealQL transaction so a
//! uniqueness violation on either row aborts the pair — a tenant
//! without its first user is never observable.

use chrono::{DateTime, Utc};
use stagedoor_core::error::StagedoorResult;
use stagedoor_core::models::tenant::{CreateTenant, SubscriptionTier, Tenant};
use stagedoor_core::models::user::{CreateUser, IdentityProvider, Role, User, UserWithTenant};
use stagedoor_core::repository::IdentityStore;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, classify_statement_errors};

/// DB-side tenant row for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    subdomain: String,
    tier: String,
    trial_ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side tenant row that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    subdomain: String,
    tier: String,
    trial_ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side user row for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    tenant_id: String,
    email: String,
    name: String,
    password_hash: Option<String>,
    google_id: Option<String>,
    microsoft_id: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side user row that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    tenant_id: String,
    email: String,
    name: String,
    password_hash: Option<String>,
    google_id: Option<String>,
    microsoft_id: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_tier(s: &str) -> Result<SubscriptionTier, DbError> {
    match s {
        "TRIAL" => Ok(SubscriptionTier::Trial),
        "STANDARD" => Ok(SubscriptionTier::Standard),
        "PRO" => Ok(SubscriptionTier::Pro),
        other => Err(DbError::Decode(format!("unknown tier: {other}"))),
    }
}

fn tier_to_string(tier: SubscriptionTier) -> &'static str {
    match tier {
        SubscriptionTier::Trial => "TRIAL",
        SubscriptionTier::Standard => "STANDARD",
        SubscriptionTier::Pro => "PRO",
    }
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "ADMIN" => Ok(Role::Admin),
        "LEADER" => Ok(Role::Leader),
        "MEMBER" => Ok(Role::Member),
        other => Err(DbError::Decode(format!("unknown role: {other}"))),
    }
}

fn role_to_string(role: Role) -> &'static str {
    match role {
        Role::Admin => "ADMIN",
        Role::Leader => "LEADER",
        Role::Member => "MEMBER",
    }
}

/// Column holding the provider id. Closed enum, never caller input,
/// so it is safe to splice into a query string.
fn provider_column(provider: IdentityProvider) -> &'static str {
    match provider {
        IdentityProvider::Google => "google_id",
        IdentityProvider::Microsoft => "microsoft_id",
    }
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id,
            name: self.name,
            subdomain: self.subdomain,
            tier: parse_tier(&self.tier)?,
            trial_ends_at: self.trial_ends_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        Ok(Tenant {
            id,
            name: self.name,
            subdomain: self.subdomain,
            tier: parse_tier(&self.tier)?,
            trial_ends_at: self.trial_ends_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        Ok(User {
            id,
            tenant_id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            google_id: self.google_id,
            microsoft_id: self.microsoft_id,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        Ok(User {
            id,
            tenant_id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            google_id: self.google_id,
            microsoft_id: self.microsoft_id,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the tenant/user store.
#[derive(Clone)]
pub struct SurrealIdentityStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIdentityStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Load the owning tenant of a user row. A dangling reference
    /// means the store lost the pairing invariant, so it is an error
    /// rather than an absence.
    async fn fetch_tenant(&self, id: Uuid) -> Result<Tenant, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<TenantRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        row.into_tenant(id)
    }
}

impl<C: Connection> IdentityStore for SurrealIdentityStore<C> {
    async fn create_tenant_with_user(
        &self,
        tenant: CreateTenant,
        user: CreateUser,
    ) -> StagedoorResult<(Tenant, User)> {
        let tenant_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let tenant_id_str = tenant_id.to_string();
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('tenant', $tenant_id) SET \
                 name = $tenant_name, subdomain = $subdomain, \
                 tier = $tier, trial_ends_at = $trial_ends_at; \
                 CREATE type::record('user', $user_id) SET \
                 tenant_id = $tenant_id, email = $email, \
                 name = $user_name, password_hash = $password_hash, \
                 google_id = $google_id, \
                 microsoft_id = $microsoft_id, role = $role; \
                 COMMIT TRANSACTION;",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .bind(("user_id", user_id_str.clone()))
            .bind(("tenant_name", tenant.name))
            .bind(("subdomain", tenant.subdomain))
            .bind(("tier", tier_to_string(tenant.tier).to_string()))
            .bind(("trial_ends_at", tenant.trial_ends_at))
            .bind(("email", user.email))
            .bind(("user_name", user.name))
            .bind(("password_hash", user.password_hash))
            .bind(("google_id", user.google_id))
            .bind(("microsoft_id", user.microsoft_id))
            .bind(("role", role_to_string(user.role).to_string()))
            .await
            .map_err(DbError::from)?;

        // Inspect every statement: inside an aborted transaction only
        // the violating statement names the unique index.
        if let Some(err) = classify_statement_errors(result.take_errors()) {
            return Err(err.into());
        }

        // BEGIN and COMMIT occupy result slots 0 and 3 (with NONE
        // results): statement 1 is the tenant CREATE, statement 2 is
        // the user CREATE.
        let tenant_rows: Vec<TenantRow> = result.take(1).map_err(DbError::from)?;
        let user_rows: Vec<UserRow> = result.take(2).map_err(DbError::from)?;

        let tenant_row = tenant_rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "tenant".into(),
                id: tenant_id_str,
            })?;
        let user_row = user_rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                entity: "user".into(),
                id: user_id_str,
            })?;

        Ok((
            tenant_row.into_tenant(tenant_id)?,
            user_row.into_user(user_id)?,
        ))
    }

    async fn find_user_by_email(&self, email: &str) -> StagedoorResult<Option<UserWithTenant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let user = row.try_into_user()?;
        let tenant = self.fetch_tenant(user.tenant_id).await?;
        Ok(Some(UserWithTenant { user, tenant }))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StagedoorResult<Option<UserWithTenant>> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let user = row.into_user(id)?;
        let tenant = self.fetch_tenant(user.tenant_id).await?;
        Ok(Some(UserWithTenant { user, tenant }))
    }

    async fn find_tenant_by_subdomain(&self, subdomain: &str) -> StagedoorResult<Option<Tenant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 WHERE subdomain = $subdomain",
            )
            .bind(("subdomain", subdomain.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_tenant()?)),
            None => Ok(None),
        }
    }

    async fn update_provider_link(
        &self,
        user_id: Uuid,
        provider: IdentityProvider,
        provider_user_id: &str,
    ) -> StagedoorResult<UserWithTenant> {
        let id_str = user_id.to_string();
        let column = provider_column(provider);

        let query = format!(
            "UPDATE type::record('user', $id) SET \
             {column} = $provider_id, updated_at = time::now()"
        );

        let result = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("provider_id", provider_user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        let user = row.into_user(user_id)?;
        let tenant = self.fetch_tenant(user.tenant_id).await?;
        Ok(UserWithTenant { user, tenant })
    }
}
