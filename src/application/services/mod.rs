//! Use-case services called by the HTTP handlers and the admin CLI.

pub mod auth_service;
pub mod link_service;

pub use auth_service::AuthService;
pub use link_service::{LinkService, short_url};
