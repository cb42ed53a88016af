//! # dirauth-core
//!
//! Shared types for directory-backed credential verification.
//!
//! This crate provides the error taxonomy used by the directory
//! authenticator and the structured error responses handed to the HTTP
//! layer that fronts it.
//!
//! ## Modules
//!
//! - [`error`] - Error classification, stable codes, and response mapping

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;

// Re-export commonly used types
pub use error::{Error, Result};
