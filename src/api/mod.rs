//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Request and response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting and tracing
//! - [`routes`] - Route groups

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
