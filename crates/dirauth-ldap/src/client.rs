//! Directory credential verification.
//!
//! A verification attempt is two short-lived connections: an anonymous
//! pre-flight bind that proves the directory is reachable, then a fresh
//! connection binding with the presented credential. Each bind races a single
//! deadline, the attempt is never retried, and every opened connection is
//! released exactly once whichever way the race resolves.

use crate::{config::DirectoryConfig, Result};
use async_trait::async_trait;
use dirauth_core::Error;
use ldap3::{LdapConnAsync, LdapConnSettings};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// A transient identifier/secret pair presented for verification.
///
/// The secret is wrapped so it cannot leak through `Debug` output or logs;
/// nothing in this crate persists a credential.
#[derive(Debug)]
pub struct Credential {
    identifier: String,
    secret: SecretString,
}

impl Credential {
    /// Creates a credential from a directory identity (email/UPN) and its
    /// password.
    pub fn new(identifier: impl Into<String>, secret: impl Into<SecretString>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Returns the bind principal (email/UPN).
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the wrapped secret.
    #[must_use]
    pub const fn secret(&self) -> &SecretString {
        &self.secret
    }
}

/// Outcome of a credential verification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    /// The directory accepted the credential bind.
    Accepted,
    /// The directory refused the credential bind, or the connection failed
    /// while attempting it.
    Rejected {
        /// Classified failure behind the rejection.
        cause: Error,
    },
}

impl Verification {
    /// Returns true if the credential was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the classified failure for a rejected credential.
    #[must_use]
    pub const fn cause(&self) -> Option<&Error> {
        match self {
            Self::Accepted => None,
            Self::Rejected { cause } => Some(cause),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait LdapSession: Send {
    async fn simple_bind(&mut self, dn: &str, password: &str) -> Result<()>;
    async fn unbind(&mut self) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait LdapConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn LdapSession>>;
}

/// Verifies credentials against a directory endpoint with a pluggable LDAP
/// backend.
///
/// Concurrent calls are independent; each owns its own connections and the
/// configuration is shared read-only.
pub struct DirectoryAuthenticator {
    config: Arc<DirectoryConfig>,
    connector: Box<dyn LdapConnector>,
}

impl DirectoryAuthenticator {
    /// Creates an authenticator that uses the real LDAP connector.
    #[must_use]
    pub fn new(config: DirectoryConfig) -> Self {
        let config = Arc::new(config);
        let connector: Box<dyn LdapConnector> = Box::new(RealLdapConnector {
            config: config.clone(),
        });
        Self { config, connector }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_connector(config: DirectoryConfig, connector: Box<dyn LdapConnector>) -> Self {
        Self {
            config: Arc::new(config),
            connector,
        }
    }

    /// Checks that the directory accepts an anonymous bind within the
    /// configured budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectivityCheckFailed`] wrapping the classified
    /// failure.
    pub async fn test_connectivity(&self) -> Result<()> {
        debug!(endpoint = %self.config.url(), "testing directory connectivity");
        match self.bind_once("", "").await {
            Ok(()) => {
                debug!(endpoint = %self.config.url(), "directory connectivity check passed");
                Ok(())
            }
            Err(err) => {
                warn!(
                    endpoint = %self.config.url(),
                    code = err.error_code(),
                    "directory connectivity check failed"
                );
                Err(err.into_connectivity_failure())
            }
        }
    }

    /// Verifies a credential by binding as it against the directory.
    ///
    /// Runs the anonymous connectivity check first and propagates its failure
    /// without attempting the credential bind, so connectivity problems are
    /// reported distinctly from bad credentials. A refused bind (or a
    /// connection failure during it) is an `Ok` outcome carrying the cause;
    /// only pre-flight failures and a silent directory produce an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectivityCheckFailed`] if the pre-flight check
    /// fails, or [`Error::Timeout`] if the credential bind never resolves
    /// within the budget.
    pub async fn verify_credentials(&self, credential: &Credential) -> Result<Verification> {
        self.test_connectivity().await?;

        debug!(endpoint = %self.config.url(), "attempting credential bind");
        match self
            .bind_once(credential.identifier(), credential.secret().expose_secret())
            .await
        {
            Ok(()) => {
                debug!(endpoint = %self.config.url(), "credential bind accepted");
                Ok(Verification::Accepted)
            }
            Err(cause @ (Error::BindRejected(_) | Error::ConnectionError(_))) => {
                debug!(
                    endpoint = %self.config.url(),
                    code = cause.error_code(),
                    "credential bind not accepted"
                );
                Ok(Verification::Rejected { cause })
            }
            Err(err) => {
                warn!(
                    endpoint = %self.config.url(),
                    code = err.error_code(),
                    "credential verification aborted"
                );
                Err(err)
            }
        }
    }

    /// Opens one connection, performs one bind, releases the connection
    /// exactly once.
    async fn bind_once(&self, principal: &str, secret: &str) -> Result<()> {
        let mut session = self.connector.connect().await?;

        // Race the bind against the deadline. The losing future is dropped,
        // so exactly one of {bind outcome, timeout} resolves this attempt.
        let outcome = timeout(self.config.timeout(), session.simple_bind(principal, secret)).await;

        // Single release point for this connection, on every path. A failed
        // release is logged but never overrides the bind outcome: the
        // directory has already answered the only question being asked.
        if let Err(err) = session.unbind().await {
            debug!(code = err.error_code(), "directory connection release failed");
        }

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(Error::Timeout(format!(
                "no bind response within {} ms",
                self.config.timeout_millis()
            ))),
        }
    }
}

struct RealLdapConnector {
    config: Arc<DirectoryConfig>,
}

#[async_trait]
impl LdapConnector for RealLdapConnector {
    async fn connect(&self) -> Result<Box<dyn LdapSession>> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.config.timeout());
        let (conn, ldap) = LdapConnAsync::with_settings(settings, self.config.url())
            .await
            .map_err(map_ldap_error)?;
        ldap3::drive!(conn);
        Ok(Box::new(RealLdapSession {
            inner: ldap,
            operation_timeout: self.config.timeout(),
        }))
    }
}

struct RealLdapSession {
    inner: ldap3::Ldap,
    operation_timeout: Duration,
}

#[async_trait]
impl LdapSession for RealLdapSession {
    async fn simple_bind(&mut self, dn: &str, password: &str) -> Result<()> {
        let result = timeout(self.operation_timeout, self.inner.simple_bind(dn, password))
            .await
            .map_err(|_| Error::Timeout("directory bind timed out".to_string()))?
            .map_err(map_ldap_error)?;
        if result.rc == 0 {
            Ok(())
        } else {
            Err(Error::BindRejected(format!(
                "result code {}: {}",
                result.rc, result.text
            )))
        }
    }

    async fn unbind(&mut self) -> Result<()> {
        timeout(self.operation_timeout, self.inner.unbind())
            .await
            .map_err(|_| Error::Timeout("directory unbind timed out".to_string()))?
            .map_err(map_ldap_error)?;
        Ok(())
    }
}

fn map_ldap_error(err: ldap3::LdapError) -> Error {
    Error::ConnectionError(err.to_string())
}
