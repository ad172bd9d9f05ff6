//! Integration tests for the identity store and service repository
//! implementations using in-memory SurrealDB.

use chrono::{Duration, Utc};
use stagedoor_core::error::{StagedoorError, UniqueField};
use stagedoor_core::models::service::CreateService;
use stagedoor_core::models::tenant::{CreateTenant, SubscriptionTier};
use stagedoor_core::models::user::{CreateUser, IdentityProvider, Role};
use stagedoor_core::repository::{IdentityStore, ServiceRepository};
use stagedoor_db::repository::{SurrealIdentityStore, SurrealServiceRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    stagedoor_db::run_migrations(&db).await.unwrap();
    db
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Raw row count, bypassing the store under test.
async fn count_rows(db: &Surreal<surrealdb::engine::local::Db>, table: &str) -> u64 {
    let mut result = db
        .query(format!("SELECT count() AS total FROM {table} GROUP ALL"))
        .await
        .unwrap();
    let rows: Vec<CountRow> = result.take(0).unwrap();
    rows.first().map(|r| r.total).unwrap_or(0)
}

fn tenant_input(name: &str, subdomain: &str) -> CreateTenant {
    CreateTenant {
        name: name.into(),
        subdomain: subdomain.into(),
        tier: SubscriptionTier::Trial,
        trial_ends_at: Some(Utc::now() + Duration::days(30)),
    }
}

fn user_input(email: &str, name: &str) -> CreateUser {
    CreateUser {
        email: email.into(),
        name: name.into(),
        // Opaque to the store; realistic digests are the auth layer's
        // concern.
        password_hash: Some("$argon2id$test-digest".into()),
        google_id: None,
        microsoft_id: None,
        role: Role::Admin,
    }
}

// -----------------------------------------------------------------------
// Tenant+user creation
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_tenant_with_user_creates_both_rows() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db.clone());

    let (tenant, user) = store
        .create_tenant_with_user(
            tenant_input("Grace Church", "grace-church"),
            user_input("pastor@grace.org", "Sam Rivera"),
        )
        .await
        .unwrap();

    assert_eq!(tenant.name, "Grace Church");
    assert_eq!(tenant.subdomain, "grace-church");
    assert_eq!(tenant.tier, SubscriptionTier::Trial);
    assert!(tenant.trial_ends_at.is_some());

    assert_eq!(user.email, "pastor@grace.org");
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.tenant_id, tenant.id);

    assert_eq!(count_rows(&db, "tenant").await, 1);
    assert_eq!(count_rows(&db, "user").await, 1);
}

#[tokio::test]
async fn duplicate_email_aborts_the_whole_transaction() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db.clone());

    store
        .create_tenant_with_user(
            tenant_input("First Org", "first-org"),
            user_input("shared@example.com", "First"),
        )
        .await
        .unwrap();

    // Same email, different subdomain: the user CREATE violates the
    // email index and must take the tenant CREATE down with it.
    let err = store
        .create_tenant_with_user(
            tenant_input("Second Org", "second-org"),
            user_input("shared@example.com", "Second"),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StagedoorError::Conflict {
            field: UniqueField::Email
        }
    ));

    // No partial write: the second tenant must not exist.
    assert_eq!(count_rows(&db, "tenant").await, 1);
    assert_eq!(count_rows(&db, "user").await, 1);
    assert!(
        store
            .find_tenant_by_subdomain("second-org")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_subdomain_conflicts() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db.clone());

    store
        .create_tenant_with_user(
            tenant_input("First Org", "same-subdomain"),
            user_input("first@example.com", "First"),
        )
        .await
        .unwrap();

    let err = store
        .create_tenant_with_user(
            tenant_input("Second Org", "same-subdomain"),
            user_input("second@example.com", "Second"),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StagedoorError::Conflict {
            field: UniqueField::Subdomain
        }
    ));

    assert_eq!(count_rows(&db, "tenant").await, 1);
    assert_eq!(count_rows(&db, "user").await, 1);
}

// -----------------------------------------------------------------------
// Lookups
// -----------------------------------------------------------------------

#[tokio::test]
async fn find_user_by_email_returns_user_with_tenant() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db);

    let (tenant, user) = store
        .create_tenant_with_user(
            tenant_input("Lookup Org", "lookup-org"),
            user_input("lookup@example.com", "Lookup"),
        )
        .await
        .unwrap();

    let found = store
        .find_user_by_email("lookup@example.com")
        .await
        .unwrap()
        .expect("user should exist");

    assert_eq!(found.user.id, user.id);
    assert_eq!(found.tenant.id, tenant.id);
    assert_eq!(found.tenant.subdomain, "lookup-org");
}

#[tokio::test]
async fn find_user_by_email_miss_is_none() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db);

    let found = store.find_user_by_email("nobody@example.com").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_user_by_id_roundtrip() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db);

    let (_, user) = store
        .create_tenant_with_user(
            tenant_input("Id Org", "id-org"),
            user_input("byid@example.com", "ById"),
        )
        .await
        .unwrap();

    let found = store
        .find_user_by_id(user.id)
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(found.user.email, "byid@example.com");
    assert_eq!(found.tenant.name, "Id Org");

    // Unknown id is a miss, not an error.
    assert!(store.find_user_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn find_tenant_by_subdomain_hit_and_miss() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db);

    let (tenant, _) = store
        .create_tenant_with_user(
            tenant_input("Sub Org", "sub-org"),
            user_input("sub@example.com", "Sub"),
        )
        .await
        .unwrap();

    let found = store
        .find_tenant_by_subdomain("sub-org")
        .await
        .unwrap()
        .expect("tenant should exist");
    assert_eq!(found.id, tenant.id);

    assert!(
        store
            .find_tenant_by_subdomain("missing-org")
            .await
            .unwrap()
            .is_none()
    );
}

// -----------------------------------------------------------------------
// Provider links
// -----------------------------------------------------------------------

#[tokio::test]
async fn update_provider_link_sets_the_slot() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db);

    let (_, user) = store
        .create_tenant_with_user(
            tenant_input("Link Org", "link-org"),
            user_input("link@example.com", "Link"),
        )
        .await
        .unwrap();
    assert!(user.google_id.is_none());

    let linked = store
        .update_provider_link(user.id, IdentityProvider::Google, "google-oauth-123")
        .await
        .unwrap();

    assert_eq!(linked.user.google_id.as_deref(), Some("google-oauth-123"));
    assert!(linked.user.microsoft_id.is_none(), "other slot untouched");
    assert!(linked.user.updated_at >= user.updated_at);
}

#[tokio::test]
async fn update_provider_link_unknown_user_is_not_found() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db);

    let err = store
        .update_provider_link(Uuid::new_v4(), IdentityProvider::Microsoft, "ms-456")
        .await
        .unwrap_err();

    assert!(matches!(err, StagedoorError::NotFound { .. }));
}

// -----------------------------------------------------------------------
// Service repository and tenant isolation
// -----------------------------------------------------------------------

async fn seed_tenant(
    store: &SurrealIdentityStore<surrealdb::engine::local::Db>,
    subdomain: &str,
    email: &str,
) -> Uuid {
    let (tenant, _) = store
        .create_tenant_with_user(
            tenant_input(subdomain, subdomain),
            user_input(email, "Seeder"),
        )
        .await
        .unwrap();
    tenant.id
}

#[tokio::test]
async fn services_are_isolated_per_tenant() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db.clone());
    let services = SurrealServiceRepository::new(db);

    let tenant_a = seed_tenant(&store, "tenant-a", "a@example.com").await;
    let tenant_b = seed_tenant(&store, "tenant-b", "b@example.com").await;

    // Overlapping service names across tenants.
    for tenant_id in [tenant_a, tenant_b] {
        services
            .create(CreateService {
                tenant_id,
                name: "Sunday Service".into(),
                day_of_week: 0,
                start_time: "10:00 AM".into(),
                is_active: true,
            })
            .await
            .unwrap();
    }
    let b_extra = services
        .create(CreateService {
            tenant_id: tenant_b,
            name: "Youth Night".into(),
            day_of_week: 5,
            start_time: "7:00 PM".into(),
            is_active: true,
        })
        .await
        .unwrap();

    let a_list = services.list(tenant_a).await.unwrap();
    assert_eq!(a_list.len(), 1);
    assert!(a_list.iter().all(|s| s.tenant_id == tenant_a));

    let b_list = services.list(tenant_b).await.unwrap();
    assert_eq!(b_list.len(), 2);
    assert!(b_list.iter().all(|s| s.tenant_id == tenant_b));

    // A record id of tenant B resolves to a miss under tenant A.
    let cross = services.get(tenant_a, b_extra.id).await.unwrap();
    assert!(cross.is_none(), "cross-tenant get must miss");

    let own = services.get(tenant_b, b_extra.id).await.unwrap();
    assert!(own.is_some());
}

#[tokio::test]
async fn services_list_ordered_by_day_then_time() {
    let db = setup().await;
    let store = SurrealIdentityStore::new(db.clone());
    let services = SurrealServiceRepository::new(db);

    let tenant_id = seed_tenant(&store, "ordered-org", "order@example.com").await;

    // start_time is stored as a plain string, so ordering within a day
    // is lexicographic.
    for (name, day, time) in [
        ("Midweek", 3, "07:00 PM"),
        ("Early", 0, "09:00 AM"),
        ("Late", 0, "11:30 AM"),
    ] {
        services
            .create(CreateService {
                tenant_id,
                name: name.into(),
                day_of_week: day,
                start_time: time.into(),
                is_active: true,
            })
            .await
            .unwrap();
    }

    let list = services.list(tenant_id).await.unwrap();
    let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Early", "Late", "Midweek"]);
}

// -----------------------------------------------------------------------
// Migrations
// -----------------------------------------------------------------------

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup().await;
    // setup() already ran them once; a second run must be a no-op.
    stagedoor_db::run_migrations(&db).await.unwrap();
    assert_eq!(count_rows(&db, "_migration").await, 1);
}
