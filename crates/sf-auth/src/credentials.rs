//! Credentials trait and implementations.
//!
//! All credential types implement custom Debug to redact sensitive data.

use crate::error::{Error, ErrorKind, Result};

/// Trait for Salesforce credentials.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token.
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "62.0").
    fn api_version(&self) -> &str;

    /// The session id placed in SOAP `SessionHeader`s.
    ///
    /// For OAuth sessions this is the access token.
    fn session_id(&self) -> &str {
        self.access_token()
    }

    /// Host (and port, if any) of the instance URL, e.g. `acme.my.salesforce.com`.
    ///
    /// Returns `None` when the instance URL is empty or unparseable.
    fn instance_host(&self) -> Option<String> {
        let parsed = url::Url::parse(self.instance_url()).ok()?;
        let host = parsed.host_str()?;
        if host.is_empty() {
            return None;
        }
        Some(match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.access_token().is_empty()
    }
}

impl<C: Credentials + ?Sized> Credentials for std::sync::Arc<C> {
    fn instance_url(&self) -> &str {
        (**self).instance_url()
    }

    fn access_token(&self) -> &str {
        (**self).access_token()
    }

    fn api_version(&self) -> &str {
        (**self).api_version()
    }

    fn session_id(&self) -> &str {
        (**self).session_id()
    }

    fn instance_host(&self) -> Option<String> {
        (**self).instance_host()
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}

/// Standard Salesforce credentials implementation.
///
/// The access token is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct SalesforceCredentials {
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl SalesforceCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
        }
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_INSTANCE_URL` or `SALESFORCE_INSTANCE_URL`
    /// - `SF_ACCESS_TOKEN` or `SALESFORCE_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `SF_API_VERSION` or `SALESFORCE_API_VERSION` (default: "62.0")
    pub fn from_env() -> Result<Self> {
        let instance_url = std::env::var("SF_INSTANCE_URL")
            .or_else(|_| std::env::var("SALESFORCE_INSTANCE_URL"))
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_INSTANCE_URL".to_string())))?;

        let access_token = std::env::var("SF_ACCESS_TOKEN")
            .or_else(|_| std::env::var("SALESFORCE_ACCESS_TOKEN"))
            .map_err(|_| Error::new(ErrorKind::EnvVar("SF_ACCESS_TOKEN".to_string())))?;

        let api_version = std::env::var("SF_API_VERSION")
            .or_else(|_| std::env::var("SALESFORCE_API_VERSION"))
            .unwrap_or_else(|_| sfmcp_client::DEFAULT_API_VERSION.to_string());

        Self::new(instance_url, access_token, api_version).validated()
    }

    /// Check that the instance URL is an absolute http(s) URL and the token is set.
    pub fn validated(self) -> Result<Self> {
        let parsed = url::Url::parse(&self.instance_url)?;
        if !matches!(parsed.scheme(), "https" | "http") {
            return Err(Error::new(ErrorKind::InvalidCredentials(format!(
                "unsupported instance URL scheme '{}'",
                parsed.scheme()
            ))));
        }
        if self.access_token.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "access token is empty".to_string(),
            )));
        }
        Ok(self)
    }

    /// Change the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the base REST API URL for this org.
    pub fn rest_api_url(&self) -> String {
        format!(
            "{}/services/data/v{}",
            self.instance_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

impl Credentials for SalesforceCredentials {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}
