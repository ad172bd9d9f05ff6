//! Store trait definitions for data access abstraction.
//!
//! All operations are async. Identity lookups are global (email is
//! unique across tenants); resource repositories take a `tenant_id`
//! on every call to enforce isolation.

use uuid::Uuid;

use crate::error::StagedoorResult;
use crate::models::{
    service::{CreateService, Service},
    tenant::{CreateTenant, Tenant},
    user::{CreateUser, IdentityProvider, User, UserWithTenant},
};

/// Transactional store for tenants and users.
///
/// Lookups return `Ok(None)` on a miss — absence is data here, not a
/// failure; the caller decides which taxonomy member a miss maps to.
/// Infrastructure faults surface as `StoreUnavailable`.
pub trait IdentityStore: Send + Sync {
    /// Atomically create a tenant together with its first user.
    ///
    /// Either both rows exist afterward or neither does. A uniqueness
    /// violation on email or subdomain aborts the whole unit and
    /// surfaces as `Conflict` — never as a partial write.
    fn create_tenant_with_user(
        &self,
        tenant: CreateTenant,
        user: CreateUser,
    ) -> impl Future<Output = StagedoorResult<(Tenant, User)>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = StagedoorResult<Option<UserWithTenant>>> + Send;

    fn find_user_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StagedoorResult<Option<UserWithTenant>>> + Send;

    fn find_tenant_by_subdomain(
        &self,
        subdomain: &str,
    ) -> impl Future<Output = StagedoorResult<Option<Tenant>>> + Send;

    /// Attach a federated provider id to an existing user.
    ///
    /// Overwrites nothing: the caller checks the slot is empty first
    /// (the operation is used idempotently). Fails with `NotFound` if
    /// the user does not exist.
    fn update_provider_link(
        &self,
        user_id: Uuid,
        provider: IdentityProvider,
        provider_user_id: &str,
    ) -> impl Future<Output = StagedoorResult<UserWithTenant>> + Send;
}

/// Tenant-scoped repository for services.
///
/// Every operation filters by `tenant_id`; an id belonging to another
/// tenant resolves to `Ok(None)`, indistinguishable from a plain
/// miss.
pub trait ServiceRepository: Send + Sync {
    fn create(&self, input: CreateService) -> impl Future<Output = StagedoorResult<Service>> + Send;

    /// All services of a tenant, ordered by day of week then start
    /// time.
    fn list(&self, tenant_id: Uuid) -> impl Future<Output = StagedoorResult<Vec<Service>>> + Send;

    fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = StagedoorResult<Option<Service>>> + Send;
}
