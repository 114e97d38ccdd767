//! # sfmcp-client
//!
//! Shared HTTP plumbing for the Salesforce calls made by the MCP tools.
//!
//! This crate provides:
//! - [`ClientConfig`] with timeouts and a user agent, and a way to turn it
//!   into a `reqwest::Client`
//! - Parsing of Salesforce JSON error bodies into typed [`Error`]s, with
//!   tokens and session ids scrubbed from the message
//! - Escaping helpers in [`security`] for values spliced into XML, JSON
//!   and URLs
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use sfmcp_client::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .with_timeout(Duration::from_secs(60))
//!     .build();
//! let http = config.build_http_client()?;
//! # Ok::<(), sfmcp_client::Error>(())
//! ```

mod config;
mod error;
mod response;
pub mod security;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use response::{excerpt, parse_error_response, sanitize_error_message, ResponseExt, MAX_ERROR_TEXT};

/// Default Salesforce REST API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sfmcp/", env!("CARGO_PKG_VERSION"));
