//! Domain models for stagedoor.
//!
//! These are the core types shared across all crates.

pub mod identity;
pub mod service;
pub mod tenant;
pub mod user;
