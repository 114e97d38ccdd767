//! Salesforce REST API client.
//!
//! Thin typed layer over `reqwest` for the read-path calls the MCP tools
//! make: SOQL query (with pagination), SOSL search and sObject describe.

use serde::de::DeserializeOwned;
use tracing::debug;

use sfmcp_auth::{Credentials, SalesforceCredentials};
use sfmcp_client::{ClientConfig, ResponseExt};

use crate::error::Result;

mod describe;
mod query;
mod search;

/// Salesforce REST API client.
///
/// # Example
///
/// ```rust,ignore
/// use sfmcp_auth::SalesforceCredentials;
/// use sfmcp_rest::SalesforceRestClient;
///
/// let client = SalesforceRestClient::new(SalesforceCredentials::from_env()?)?;
///
/// let accounts: Vec<serde_json::Value> = client.query_all("SELECT Id, Name FROM Account").await?;
/// let describe = client.describe_sobject("Account").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SalesforceRestClient {
    credentials: SalesforceCredentials,
    http: reqwest::Client,
}

impl SalesforceRestClient {
    /// Create a new REST client with default HTTP configuration.
    pub fn new(credentials: SalesforceCredentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a new REST client with custom HTTP configuration.
    pub fn with_config(credentials: SalesforceCredentials, config: ClientConfig) -> Result<Self> {
        let http = config.build_http_client()?;
        Ok(Self { credentials, http })
    }

    /// Get the credentials this client authenticates with.
    pub fn credentials(&self) -> &SalesforceCredentials {
        &self.credentials
    }

    /// Base URL for versioned REST resources, without a trailing slash.
    pub(crate) fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}/{}",
            self.credentials.instance_url().trim_end_matches('/'),
            self.credentials.api_version(),
            path.trim_start_matches('/')
        )
    }

    /// Resolve a server-relative URL (such as `nextRecordsUrl`) against the instance.
    pub(crate) fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/{}",
                self.credentials.instance_url().trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
    }

    /// GET a URL and deserialize the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(self.credentials.access_token())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .check_salesforce_error()
            .await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl Credentials for SalesforceRestClient {
    fn instance_url(&self) -> &str {
        self.credentials.instance_url()
    }

    fn access_token(&self) -> &str {
        self.credentials.access_token()
    }

    fn api_version(&self) -> &str {
        self.credentials.api_version()
    }
}
