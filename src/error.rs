//! Error types for the tool surface and the command-line runner.

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
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("REST error: {0}")]
    Rest(String),
    #[error("Metadata error: {0}")]
    Metadata(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<sfmcp_auth::Error> for Error {
    fn from(err: sfmcp_auth::Error) -> Self {
        Error::with_source(ErrorKind::Auth(err.to_string()), err)
    }
}

impl From<sfmcp_rest::Error> for Error {
    fn from(err: sfmcp_rest::Error) -> Self {
        Error::with_source(ErrorKind::Rest(err.to_string()), err)
    }
}

impl From<sfmcp_metadata::Error> for Error {
    fn from(err: sfmcp_metadata::Error) -> Self {
        Error::with_source(ErrorKind::Metadata(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::InvalidArguments(err.to_string()), err)
    }
}
