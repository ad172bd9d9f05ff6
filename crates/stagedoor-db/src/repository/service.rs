//! SurrealDB implementation of [`ServiceRepository`].
//!
//! Every query filters by `tenant_id` — the tenant isolation
//! boundary. A record id belonging to another tenant resolves to a
//! miss, never to the other tenant's row.

use chrono::{DateTime, Utc};
use stagedoor_core::error::StagedoorResult;
use stagedoor_core::models::service::{CreateService, Service};
use stagedoor_core::repository::ServiceRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ServiceRow {
    tenant_id: String,
    name: String,
    day_of_week: u32,
    start_time: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ServiceRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    day_of_week: u32,
    start_time: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_day_of_week(raw: u32) -> Result<u8, DbError> {
    u8::try_from(raw)
        .ok()
        .filter(|d| *d <= 6)
        .ok_or_else(|| DbError::Decode(format!("day_of_week out of range: {raw}")))
}

impl ServiceRow {
    fn into_service(self, id: Uuid) -> Result<Service, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        Ok(Service {
            id,
            tenant_id,
            name: self.name,
            day_of_week: parse_day_of_week(self.day_of_week)?,
            start_time: self.start_time,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ServiceRowWithId {
    fn try_into_service(self) -> Result<Service, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid service UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Decode(format!("invalid tenant UUID: {e}")))?;
        Ok(Service {
            id,
            tenant_id,
            name: self.name,
            day_of_week: parse_day_of_week(self.day_of_week)?,
            start_time: self.start_time,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the tenant-scoped service repository.
#[derive(Clone)]
pub struct SurrealServiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealServiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ServiceRepository for SurrealServiceRepository<C> {
    async fn create(&self, input: CreateService) -> StagedoorResult<Service> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('service', $id) SET \
                 tenant_id = $tenant_id, name = $name, \
                 day_of_week = $day_of_week, \
                 start_time = $start_time, is_active = $is_active",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("day_of_week", u32::from(input.day_of_week)))
            .bind(("start_time", input.start_time))
            .bind(("is_active", input.is_active))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id)?)
    }

    async fn list(&self, tenant_id: Uuid) -> StagedoorResult<Vec<Service>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM service \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY day_of_week ASC, start_time ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRowWithId> = result.take(0).map_err(DbError::from)?;

        let services = rows
            .into_iter()
            .map(|row| row.try_into_service())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(services)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> StagedoorResult<Option<Service>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('service', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.into_service(id)?)),
            None => Ok(None),
        }
    }
}
