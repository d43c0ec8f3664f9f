//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`cache`] - Redis and no-op redirect caches
//! - [`mail`] - SMTP and log-only notifiers
//! - [`persistence`] - PostgreSQL repositories
//! - [`security`] - Password hashing and access tokens

pub mod cache;
pub mod mail;
pub mod persistence;
pub mod security;
