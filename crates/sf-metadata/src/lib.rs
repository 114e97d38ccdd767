//! # sfmcp-metadata
//!
//! Metadata package assembly and Metadata API deploy for the Salesforce MCP
//! tools.
//!
//! ## Features
//!
//! - **Templates** - named `##placeholder##` templates, built in or loaded from disk
//! - **Field encoding** - custom field XML and Einstein model field JSON
//! - **Package builds** - per-deployment staging trees for custom objects and
//!   Einstein Studio models
//! - **Packaging** - root-relative zip archives, base64-encoded for SOAP
//! - **Deploy** - SOAP `deploy` calls with fault classification
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfmcp_auth::SalesforceCredentials;
//! use sfmcp_metadata::{FieldSpec, FieldType, MetadataPipeline, ObjectSpec, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfmcp_metadata::Error> {
//!     let session = SalesforceCredentials::from_env().expect("credentials");
//!     let pipeline = MetadataPipeline::new(PipelineConfig::from_env()?)?;
//!
//!     let spec = ObjectSpec::new("Invoice", "Invoices", "Invoice__c").with_field(
//!         FieldSpec::new(FieldType::Picklist, "Status", "Status__c")
//!             .with_picklist_values(["Open", "Closed"]),
//!     );
//!     let deployment = pipeline.deploy_custom_object(&spec, &session).await?;
//!     println!("queued as {:?}", deployment.result.async_process_id);
//!     Ok(())
//! }
//! ```

mod builder;
mod client;
mod config;
mod deploy;
pub mod diagnostics;
mod error;
mod fields;
mod manifest;
pub mod packager;
mod pipeline;
mod template;
mod types;

pub use builder::{
    BuildIssue, BuildReport, BuildStep, DeploymentKind, PackageBuilder, StagedPackage,
};
pub use client::DeployClient;
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use deploy::{DeployOptions, DeployResult};
pub use diagnostics::DiagnosticLog;
pub use error::{Error, ErrorKind, Result};
pub use fields::{
    encode_metadata_field, encode_model_field, encode_model_fields, outcome_label,
    EncodedModelField, NumberModelField, TextModelField,
};
pub use manifest::{metadata_types, PackageManifest, PackageTypeMembers};
pub use pipeline::{MetadataPipeline, ModelDeployment, ObjectDeployment};
pub use template::{names as template_names, substitute, Rendered, Substitutions, Templates};
pub use types::{
    AlgorithmType, DataType, FieldSpec, FieldType, Goal, ModelCapability, ModelFieldSpec,
    ModelFieldType, ModelSpec, ObjectSpec, DEPLOY_API_VERSION, PACKAGE_API_VERSION,
};
