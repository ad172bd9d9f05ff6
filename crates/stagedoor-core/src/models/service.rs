//! Service domain model — a recurring event slot (e.g. "Sunday
//! 10:00 AM") owned by a tenant.
//!
//! Services are the exemplar tenant-scoped resource in this core:
//! every read and write is filtered by the owning tenant, which is
//! the isolation boundary the access guards protect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// Clock time such as `10:00 AM`.
    pub start_time: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    pub tenant_id: Uuid,
    pub name: String,
    pub day_of_week: u8,
    pub start_time: String,
    pub is_active: bool,
}
