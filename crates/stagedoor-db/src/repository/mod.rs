//! SurrealDB store implementations.

mod identity;
mod service;

pub use identity::SurrealIdentityStore;
pub use service::SurrealServiceRepository;
