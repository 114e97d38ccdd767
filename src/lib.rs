//! # salesforce-mcp
//!
//! Salesforce metadata package assembly and deployment for MCP tool servers,
//! plus the read-path tools (SOQL, SOSL, describe) that sit next to them.
//!
//! ## Security
//!
//! - Session ids are redacted in `Debug` output, logs and diagnostic files
//! - Tracing skips credential parameters
//! - API names and template names are validated before they reach a path or a request
//!
//! ## Crates
//!
//! - **sfmcp-client** - Shared HTTP configuration, error shape and input escaping
//! - **sfmcp-auth** - The session: instance URL, session id, API version
//! - **sfmcp-rest** - SOQL/SOSL/describe and the field metadata cache
//! - **sfmcp-metadata** - Templates, package builds, zip packaging and SOAP deploy
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salesforce_mcp::auth::SalesforceCredentials;
//! use salesforce_mcp::metadata::{MetadataPipeline, PipelineConfig};
//! use salesforce_mcp::rest::SalesforceRestClient;
//! use salesforce_mcp::SalesforceTools;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SalesforceRestClient::new(SalesforceCredentials::from_env()?)?;
//!     let pipeline = MetadataPipeline::new(PipelineConfig::from_env()?)?;
//!     let tools = SalesforceTools::new(session, pipeline);
//!
//!     let text = tools
//!         .call(
//!             "create_object_with_fields",
//!             &serde_json::json!({
//!                 "name": "Invoice",
//!                 "plural_name": "Invoices",
//!                 "api_name": "Invoice__c",
//!                 "fields": [{"type": "Picklist", "label": "Status",
//!                             "api_name": "Status__c", "picklist_values": ["Open", "Closed"]}]
//!             }),
//!         )
//!         .await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

pub use sfmcp_auth as auth;
pub use sfmcp_client as client;
pub use sfmcp_metadata as metadata;
pub use sfmcp_rest as rest;

mod error;
pub mod tools;

pub use error::{Error, ErrorKind, Result};
pub use tools::{SalesforceTools, TOOL_NAMES};
