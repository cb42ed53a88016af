//! LDAP credential verification for directory-backed logins.
//!
//! This crate provides [`DirectoryAuthenticator`], which checks a credential
//! against an LDAP directory by performing an anonymous pre-flight bind
//! followed by a credential bind, each bounded by a configured time budget.

#![deny(missing_docs)]

mod client;
mod config;
mod dn;

pub use client::{Credential, DirectoryAuthenticator, Verification};
pub use config::{
    DirectoryConfig, DEFAULT_BASE_DN, DEFAULT_DIRECTORY_URL, DEFAULT_TIMEOUT_MILLIS,
};
pub use dn::{DistinguishedName, DistinguishedNameError};

/// Convenient result alias that reuses the core error type.
pub type Result<T> = dirauth_core::Result<T>;
