//! Domain layer for the CMS core backend.
//!
//! This crate contains:
//! - Domain models (Page, PageComponent, Language, Redirect, Principal)
//! - The permission evaluator
//! - The entity store abstraction and an in-memory implementation
//! - Page composition, i18n resolution and redirect services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::{DomainError, DomainResult};
