//! Error types for sfmcp-rest.

/// Result type alias for sfmcp-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sfmcp-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// True when the remote side reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotFound(_) | ErrorKind::ObjectNotFound(_)
        )
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Error from the shared HTTP layer.
    #[error("{0}")]
    Client(String),

    /// The server reported that the resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An sObject name failed validation before any request was made.
    #[error("Invalid object name: {0}")]
    InvalidName(String),

    /// Describe reported the object as missing or inaccessible.
    #[error("Object '{0}' not found or not accessible.")]
    ObjectNotFound(String),

    /// Any other failure while describing an object.
    #[error("Error retrieving fields for {object}: {message}")]
    DescribeError { object: String, message: String },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<sfmcp_client::Error> for Error {
    fn from(err: sfmcp_client::Error) -> Self {
        let kind = if err.is_not_found() {
            ErrorKind::NotFound(err.to_string())
        } else {
            ErrorKind::Client(err.to_string())
        };
        Error::with_source(kind, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        sfmcp_client::Error::from(err).into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}
