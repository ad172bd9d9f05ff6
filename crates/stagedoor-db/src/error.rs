//! Database-specific error types and conversions.

use std::collections::HashMap;

use stagedoor_core::error::{StagedoorError, UniqueField};

use crate::schema;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Unique index violated on {field:?}")]
    UniqueViolation { field: UniqueField },

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for StagedoorError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation { field } => StagedoorError::Conflict { field },
            DbError::NotFound { entity, id } => StagedoorError::NotFound { entity, id },
            other => StagedoorError::StoreUnavailable(other.to_string()),
        }
    }
}

/// Classify the per-statement errors of a failed query.
///
/// A unique index violation anywhere in the set wins: inside an
/// aborted transaction the violating statement carries the index
/// error while the others only report the cancellation, so every
/// statement has to be inspected. The engine error names the index,
/// which is the only reliable conflict signal it exposes.
///
/// Returns `None` when the set is empty (the query succeeded).
pub(crate) fn classify_statement_errors(
    mut errors: HashMap<usize, surrealdb::Error>,
) -> Option<DbError> {
    if errors.is_empty() {
        return None;
    }

    for err in errors.values() {
        let message = err.to_string();
        if message.contains(schema::IDX_USER_EMAIL) {
            return Some(DbError::UniqueViolation {
                field: UniqueField::Email,
            });
        }
        if message.contains(schema::IDX_TENANT_SUBDOMAIN) {
            return Some(DbError::UniqueViolation {
                field: UniqueField::Subdomain,
            });
        }
    }

    // No uniqueness signal; surface the earliest statement's error.
    let first_index = errors.keys().copied().min()?;
    errors.remove(&first_index).map(DbError::Surreal)
}
