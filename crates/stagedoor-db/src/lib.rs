//! Stagedoor Database — SurrealDB connection management, schema
//! migrations, and implementations of the `stagedoor-core` store
//! contracts.
//!
//! This crate provides:
//! - Connection management ([`connect`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Store implementations ([`SurrealIdentityStore`],
//!   [`SurrealServiceRepository`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use repository::{SurrealIdentityStore, SurrealServiceRepository};
pub use schema::{run_migrations, schema_v1};
