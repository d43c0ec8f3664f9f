//! Application layer.
//!
//! Services here coordinate repositories, credentials and the notifier. They
//! depend only on the traits in [`crate::domain`], so handlers and the admin
//! CLI share the same rules.
//!
//! - [`services::AuthService`] - registration, OTP verification, login
//! - [`services::LinkService`] - short link creation, redirects, listing

pub mod emails;
pub mod services;
