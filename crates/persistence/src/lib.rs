//! Persistence layer for the CMS core.
//!
//! This crate contains:
//! - Database connection management and schema migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - `PgStore`, the PostgreSQL implementation of `domain::services::EntityStore`

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgStore;
