//! # sfmcp-auth
//!
//! The Salesforce session as seen by the metadata pipeline: an instance URL,
//! a session id (OAuth access token) and an API version.
//!
//! Obtaining a session is out of scope. Credentials are constructed once at
//! startup (usually via [`SalesforceCredentials::from_env`]) and handed to the
//! components that need them.
//!
//! ## Security
//!
//! - The session id is redacted in `Debug` output
//! - Error messages never include credential values
//!
//! ## Example
//!
//! ```rust
//! use sfmcp_auth::{Credentials, SalesforceCredentials};
//!
//! let creds = SalesforceCredentials::new("https://acme.my.salesforce.com", "00D...", "62.0");
//! assert_eq!(creds.instance_host().as_deref(), Some("acme.my.salesforce.com"));
//! ```

mod credentials;
mod error;

pub use credentials::{Credentials, SalesforceCredentials};
pub use error::{Error, ErrorKind, Result};
