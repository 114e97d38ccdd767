//! Metadata API deploy client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use sfmcp_auth::Credentials;
use sfmcp_client::ClientConfig;

use crate::config::PipelineConfig;
use crate::deploy::DeployOptions;
use crate::diagnostics::DiagnosticLog;
use crate::error::{Error, ErrorKind, Result};

mod deploy;
pub(crate) mod xml_helpers;

/// SOAP Action header name.
static SOAP_ACTION_HEADER: HeaderName = HeaderName::from_static("soapaction");

/// Posts packaged metadata to the SOAP Metadata API.
///
/// # Example
///
/// ```rust,ignore
/// use sfmcp_auth::SalesforceCredentials;
/// use sfmcp_metadata::{DeployClient, PipelineConfig};
///
/// let client = DeployClient::new(&PipelineConfig::default())?;
/// let result = client.deploy(&base64_zip, &SalesforceCredentials::from_env()?).await?;
/// println!("queued as {:?}", result.async_process_id);
/// ```
#[derive(Debug, Clone)]
pub struct DeployClient {
    http_client: reqwest::Client,
    api_version: String,
    options: DeployOptions,
    endpoint: Option<String>,
    diagnostics: Option<DiagnosticLog>,
}

impl DeployClient {
    /// Create a deploy client with the timeouts and API version from `config`.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let http_client = ClientConfig::builder()
            .with_timeout(config.deploy_timeout)
            .with_connect_timeout(config.connect_timeout)
            .build()
            .build_http_client()?;
        Ok(Self {
            http_client,
            api_version: config.deploy_api_version.clone(),
            options: DeployOptions::default(),
            endpoint: None,
            diagnostics: None,
        })
    }

    /// Use a custom HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = client;
        self
    }

    /// Post to this URL instead of the one derived from the session host.
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn with_options(mut self, options: DeployOptions) -> Self {
        self.options = options;
        self
    }

    /// Persist request and response bodies under this log.
    pub fn with_diagnostics(mut self, log: DiagnosticLog) -> Self {
        self.diagnostics = Some(log);
        self
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Check the session and resolve the endpoint for it.
    pub(crate) fn endpoint_for<C: Credentials + ?Sized>(&self, session: &C) -> Result<String> {
        if session.session_id().trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidConnection(
                "Session id is empty.".to_string(),
            )));
        }
        let host = session.instance_host().ok_or_else(|| {
            Error::new(ErrorKind::InvalidConnection(
                "Could not retrieve instance host from Salesforce connection.".to_string(),
            ))
        })?;

        Ok(match &self.endpoint {
            Some(url) => url.clone(),
            None => format!("https://{}/services/Soap/m/{}", host, self.api_version),
        })
    }

    /// Build standard SOAP headers.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml; charset=utf-8"),
        );
        headers.insert(SOAP_ACTION_HEADER.clone(), HeaderValue::from_static("\"\""));
        headers
    }
}
