//! Configuration for the directory endpoint.
//!
//! The endpoint is process-wide state: built once at startup, shared
//! immutably into every verification attempt. One timeout governs every
//! suspension point of an attempt; there is deliberately no second default
//! for standalone connectivity checks.

use crate::{dn::DistinguishedName, Result};
use dirauth_core::Error;
use std::env;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default directory endpoint URL.
pub const DEFAULT_DIRECTORY_URL: &str = "ldap://10.91.50.51:389";
/// Default base distinguished name for the directory.
pub const DEFAULT_BASE_DN: &str = "DC=religare,DC=com";
/// Default time budget for a verification attempt, in milliseconds.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 10_000;

const ENV_DIRECTORY_URL: &str = "LDAP_URL";
const ENV_BASE_DN: &str = "LDAP_BASE_DN";
const ENV_TIMEOUT_MILLIS: &str = "LDAP_TIMEOUT_MS";

/// Configuration for connecting to the directory service.
#[derive(Debug, Clone, Validate)]
pub struct DirectoryConfig {
    #[validate(url)]
    url: String,
    base_dn: DistinguishedName,
    #[validate(range(min = 100, max = 300_000))]
    timeout_millis: u64,
}

impl DirectoryConfig {
    /// Creates a new directory configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unparseable or does not use the
    /// `ldap://` scheme.
    pub fn new(url: impl Into<String>, base_dn: DistinguishedName) -> Result<Self> {
        let url_string = url.into();
        let parsed = Url::parse(&url_string)?;
        if parsed.scheme() != "ldap" {
            return Err(Error::InvalidEndpoint(format!(
                "unsupported directory URL scheme `{}`, expected `ldap`",
                parsed.scheme()
            )));
        }

        let config = Self {
            url: url_string,
            base_dn,
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from the environment, falling back to the
    /// documented defaults so the component is operable without explicit
    /// configuration.
    ///
    /// Reads `LDAP_URL`, `LDAP_BASE_DN`, and `LDAP_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error if any present variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        let url = env::var(ENV_DIRECTORY_URL).unwrap_or_else(|_| DEFAULT_DIRECTORY_URL.to_string());
        let base_dn = env::var(ENV_BASE_DN).unwrap_or_else(|_| DEFAULT_BASE_DN.to_string());
        let base_dn = DistinguishedName::parse(&base_dn)?;

        let mut config = Self::new(url, base_dn)?;
        if let Ok(raw) = env::var(ENV_TIMEOUT_MILLIS) {
            let millis = raw.parse::<u64>().map_err(|err| {
                Error::ConfigError(format!("invalid {ENV_TIMEOUT_MILLIS} value `{raw}`: {err}"))
            })?;
            config = config.with_timeout_millis(millis)?;
        }
        Ok(config)
    }

    /// Returns the directory endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the base distinguished name.
    #[must_use]
    pub const fn base_dn(&self) -> &DistinguishedName {
        &self.base_dn
    }

    /// Returns the time budget for a verification attempt.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    /// Returns the time budget in milliseconds.
    #[must_use]
    pub const fn timeout_millis(&self) -> u64 {
        self.timeout_millis
    }

    /// Overrides the verification time budget in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the value falls outside the accepted range
    /// (100..=300000 ms).
    pub fn with_timeout_millis(mut self, millis: u64) -> Result<Self> {
        self.timeout_millis = millis;
        self.validate()?;
        Ok(self)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DIRECTORY_URL.to_string(),
            base_dn: DistinguishedName::parse(DEFAULT_BASE_DN)
                .unwrap_or_else(|_| unreachable!("default base DN is valid")),
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.url(), DEFAULT_DIRECTORY_URL);
        assert_eq!(config.base_dn().as_str(), "DC=religare,DC=com");
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }

    #[test]
    fn builder_overrides() {
        let base_dn = DistinguishedName::parse("dc=example,dc=com").unwrap();
        let config = DirectoryConfig::new("ldap://directory.example.com:389", base_dn)
            .unwrap()
            .with_timeout_millis(2_500)
            .unwrap();

        assert_eq!(config.url(), "ldap://directory.example.com:389");
        assert_eq!(config.timeout(), Duration::from_millis(2_500));
        assert_eq!(config.timeout_millis(), 2_500);
    }

    #[test]
    fn rejects_invalid_url() {
        let base_dn = DistinguishedName::parse("dc=example,dc=com").unwrap();
        let err = DirectoryConfig::new("not a url", base_dn).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn rejects_non_ldap_scheme() {
        let base_dn = DistinguishedName::parse("dc=example,dc=com").unwrap();
        let err = DirectoryConfig::new("https://directory.example.com", base_dn).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn from_env_defaults_and_overrides() {
        // Exercised in one test: env vars are process-global.
        env::remove_var(ENV_DIRECTORY_URL);
        env::remove_var(ENV_BASE_DN);
        env::remove_var(ENV_TIMEOUT_MILLIS);

        let config = DirectoryConfig::from_env().unwrap();
        assert_eq!(config.url(), DEFAULT_DIRECTORY_URL);
        assert_eq!(config.base_dn().as_str(), DEFAULT_BASE_DN);
        assert_eq!(config.timeout_millis(), DEFAULT_TIMEOUT_MILLIS);

        env::set_var(ENV_DIRECTORY_URL, "ldap://directory.example.com:1389");
        env::set_var(ENV_BASE_DN, "dc=example,dc=com");
        env::set_var(ENV_TIMEOUT_MILLIS, "2000");
        let config = DirectoryConfig::from_env().unwrap();
        assert_eq!(config.url(), "ldap://directory.example.com:1389");
        assert_eq!(config.base_dn().as_str(), "dc=example,dc=com");
        assert_eq!(config.timeout(), Duration::from_millis(2_000));

        env::set_var(ENV_TIMEOUT_MILLIS, "soon");
        let err = DirectoryConfig::from_env().unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        env::remove_var(ENV_DIRECTORY_URL);
        env::remove_var(ENV_BASE_DN);
        env::remove_var(ENV_TIMEOUT_MILLIS);
    }

    #[test]
    fn timeout_builder_rejects_out_of_range_values() {
        let base_dn = DistinguishedName::parse("dc=example,dc=com").unwrap();
        let config = DirectoryConfig::new("ldap://directory.example.com", base_dn).unwrap();

        let err = config.clone().with_timeout_millis(0).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        let err = config.clone().with_timeout_millis(400_000).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        let config = config.with_timeout_millis(100).unwrap();
        assert_eq!(config.timeout(), Duration::from_millis(100));
    }
}
