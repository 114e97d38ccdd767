//! Error types for sfmcp-metadata.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Template '{template}' has unresolved placeholders: {}", .placeholders.join(", "))]
    UnresolvedPlaceholder {
        template: String,
        placeholders: Vec<String>,
    },
    #[error("Invalid field '{field}': {reason}")]
    InvalidFieldSpec { field: String, reason: String },
    #[error("Invalid deployment input: {0}")]
    InvalidSpec(String),
    #[error("Staging directory not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Could not read package archive: {0}")]
    Base64EncodeFailure(String),
    #[error("Deployment failed: Invalid Salesforce connection. {0}")]
    InvalidConnection(String),
    #[error("Deployment failed: Network error contacting Salesforce API. Details: {0}")]
    NetworkError(String),
    #[error("Salesforce deployment API call failed: {}", fault_summary(*.status, .fault_code.as_deref(), .fault_message))]
    HttpFault {
        status: u16,
        fault_code: Option<String>,
        fault_message: String,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Zip error: {0}")]
    Zip(String),
    #[error("JSON error: {0}")]
    Json(String),
}

fn fault_summary(status: u16, fault_code: Option<&str>, fault_message: &str) -> String {
    match fault_code {
        Some(code) => format!(
            "SOAP Fault: Code='{}', Message='{}' (HTTP Status: {})",
            code, fault_message, status
        ),
        None => fault_message.to_string(),
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::with_source(ErrorKind::Zip(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<sfmcp_client::Error> for Error {
    fn from(err: sfmcp_client::Error) -> Self {
        Error::with_source(ErrorKind::Config(err.to_string()), err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::with_source(ErrorKind::NetworkError(err.to_string()), err)
    }
}
