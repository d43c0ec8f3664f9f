//! Helper functions used across the application.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_check`] - Destination URL checks
//! - [`otp`] - One-time code generation and hashing

pub mod code_generator;
pub mod otp;
pub mod url_check;
