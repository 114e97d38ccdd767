//! Build, package and deploy in one call.

use serde::Serialize;
use tracing::{instrument, warn};

use sfmcp_auth::Credentials;

use crate::builder::{BuildIssue, PackageBuilder, StagedPackage};
use crate::client::DeployClient;
use crate::config::PipelineConfig;
use crate::deploy::DeployResult;
use crate::diagnostics::ACTIVITY_LOG;
use crate::error::Result;
use crate::packager;
use crate::template::Templates;
use crate::types::{ModelSpec, ObjectSpec};

/// A custom object deployment that Salesforce accepted.
#[derive(Debug, Clone)]
pub struct ObjectDeployment {
    pub package: StagedPackage,
    /// Build steps that failed but did not stop the deployment.
    pub issues: Vec<BuildIssue>,
    pub result: DeployResult,
}

/// An Einstein model deployment that Salesforce accepted.
#[derive(Debug, Clone)]
pub struct ModelDeployment {
    pub package: StagedPackage,
    pub result: DeployResult,
}

/// The package builder wired to a deploy client.
#[derive(Debug, Clone)]
pub struct MetadataPipeline {
    builder: PackageBuilder,
    client: DeployClient,
}

impl MetadataPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let builder = PackageBuilder::new(config)?;
        let client =
            DeployClient::new(builder.config())?.with_diagnostics(builder.diagnostics().clone());
        Ok(Self { builder, client })
    }

    /// Replace the deploy client (custom endpoint, options or HTTP client).
    pub fn with_deploy_client(mut self, client: DeployClient) -> Self {
        self.client = client.with_diagnostics(self.builder.diagnostics().clone());
        self
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.builder = self.builder.with_templates(templates);
        self
    }

    pub fn builder(&self) -> &PackageBuilder {
        &self.builder
    }

    pub fn deploy_client(&self) -> &DeployClient {
        &self.client
    }

    /// Build, package and deploy a custom object.
    ///
    /// Build issues do not stop the deployment; they are returned with the
    /// result. Packaging and deploy failures, including SOAP faults, are
    /// errors.
    #[instrument(skip(self, spec, session), fields(api_name = %spec.api_name))]
    pub async fn deploy_custom_object<C: Credentials + ?Sized>(
        &self,
        spec: &ObjectSpec,
        session: &C,
    ) -> Result<ObjectDeployment> {
        self.log_activity("custom object", spec);
        let report = self.builder.build_custom_object(spec);
        let result = self.package_and_deploy(&report.package, session).await?;
        Ok(ObjectDeployment {
            package: report.package,
            issues: report.issues,
            result,
        })
    }

    /// Build, package and deploy an Einstein Studio model.
    #[instrument(skip(self, spec, session), fields(model = %spec.model_name))]
    pub async fn deploy_einstein_model<C: Credentials + ?Sized>(
        &self,
        spec: &ModelSpec,
        session: &C,
    ) -> Result<ModelDeployment> {
        self.log_activity("einstein model", spec);
        let package = self.builder.build_einstein_model(spec)?;
        let result = self.package_and_deploy(&package, session).await?;
        Ok(ModelDeployment { package, result })
    }

    async fn package_and_deploy<C: Credentials + ?Sized>(
        &self,
        package: &StagedPackage,
        session: &C,
    ) -> Result<DeployResult> {
        let outcome: Result<DeployResult> = async {
            let base64_zip = packager::package(&package.root)?;
            self.client.deploy(&base64_zip, session).await?.into_result()
        }
        .await;

        if !self.builder.config().keep_staging {
            if let Err(e) = package.cleanup() {
                warn!(staging_dir = %package.root.display(), error = %e, "failed to clean up staging");
            }
        }
        outcome
    }

    fn log_activity<T: Serialize>(&self, operation: &str, request: &T) {
        match serde_json::to_string(request) {
            Ok(json) => self
                .builder
                .diagnostics()
                .append(ACTIVITY_LOG, &format!("{}: {}", operation, json)),
            Err(e) => warn!(operation, error = %e, "failed to serialize request for activity log"),
        }
    }
}
