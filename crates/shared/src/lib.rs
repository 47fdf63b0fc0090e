//! Shared utilities and common types for the CMS core backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access token issuance and verification
//! - Offset pagination helpers
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod validation;
