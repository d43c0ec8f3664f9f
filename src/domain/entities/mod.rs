//! Core domain entities.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`User`] - A registered account
//!
//! Both implement [`crate::query::Filterable`] so listings can be evaluated
//! in memory as well as in PostgreSQL.

pub mod link;
pub mod user;

pub use link::{LINK_COLUMNS, Link, NewLink};
pub use user::{Role, USER_COLUMNS, User};
