//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;

pub use auth::{
    list_users_handler, login_handler, me_handler, register_handler, resend_otp_handler,
    verify_otp_handler,
};
pub use health::{health_handler, ping_handler};
pub use links::{create_link_handler, list_links_handler, redirect_handler};
