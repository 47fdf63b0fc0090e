//! HTTP boundary for the CMS core: configuration, middleware and routes.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
