//! Stagedoor Core — domain models, store contracts, and the shared
//! error taxonomy for the identity subsystem.
//!
//! This crate has no I/O. Persistence lives in `stagedoor-db`, the
//! credential and token machinery in `stagedoor-auth`.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{StagedoorError, StagedoorResult, UniqueField};
