//! Domain layer containing business entities and collaborator contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`ports`] - Credentials and notification traits
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers; implementations live in [`crate::infrastructure`].

pub mod entities;
pub mod ports;
pub mod repositories;
