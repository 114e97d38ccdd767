//! # sfmcp-rest
//!
//! The read path of the Salesforce MCP tools.
//!
//! ## Features
//!
//! - **SOQL Query** - `query_all` follows `nextRecordsUrl` until every page is fetched
//! - **SOSL Search** - Full-text search across objects
//! - **Describe** - Object and field metadata
//! - **Field metadata cache** - [`FieldMetadataCache`] memoizes normalized
//!   describe results per object with a pluggable [`EvictionPolicy`]
//!
//! The [`SalesforceSession`] trait is the capability the rest of the system
//! consumes; [`SalesforceRestClient`] is its HTTP implementation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfmcp_auth::SalesforceCredentials;
//! use sfmcp_rest::{FieldMetadataCache, SalesforceRestClient, SalesforceSession};
//!
//! let client = SalesforceRestClient::new(SalesforceCredentials::from_env()?)?;
//! let cache = FieldMetadataCache::new();
//!
//! let fields = cache
//!     .get_fields("Account", |name| async move { client.describe(&name).await })
//!     .await?;
//! ```

mod cache;
mod client;
mod describe;
mod error;
mod query;
mod session;

pub use cache::{
    CacheStats, EvictionPolicy, FieldDescription, FieldMetadata, FieldMetadataCache, NoEviction,
    ObjectInfo,
};
pub use client::SalesforceRestClient;
pub use describe::{DescribeSObjectResult, FieldDescribe, PicklistValue};
pub use error::{Error, ErrorKind, Result};
pub use query::{QueryResult, SearchResult};
pub use session::SalesforceSession;
