//! Deploy request options, the SOAP envelope and the deploy result.

use serde::{Deserialize, Serialize};
use sfmcp_client::security::xml;

use crate::error::{Error, ErrorKind, Result};

/// Placeholder written instead of the session id in persisted envelopes.
pub(crate) const REDACTED: &str = "[REDACTED]";

/// Flags sent in `<met:DeployOptions>` with every package.
///
/// The pipeline deploys with the defaults: a real (not check-only) deploy of
/// one package that rolls back as a whole. The other flags stay off and are
/// exposed for callers that build their own [`DeployClient`](crate::DeployClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployOptions {
    /// `allowMissingFiles`: accept a `package.xml` naming files the zip lacks.
    pub allow_missing_files: bool,
    /// `autoUpdatePackage`: let the server add staged files missing from `package.xml`.
    pub auto_update_package: bool,
    /// `checkOnly`: validate the object or model bundle without saving it.
    pub check_only: bool,
    /// `ignoreWarnings`
    pub ignore_warnings: bool,
    /// `performRetrieve`
    pub perform_retrieve: bool,
    /// `purgeOnDelete`: never set by this pipeline, which has no destructive changes.
    pub purge_on_delete: bool,
    /// `rollbackOnError`: a failing field or profile entry rejects the whole package.
    pub rollback_on_error: bool,
    /// `singlePackage`: the zip root holds `package.xml` directly.
    pub single_package: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            allow_missing_files: false,
            auto_update_package: false,
            check_only: false,
            ignore_warnings: false,
            perform_retrieve: false,
            purge_on_delete: false,
            rollback_on_error: true,
            single_package: true,
        }
    }
}

impl DeployOptions {
    /// The `<met:DeployOptions>` element.
    pub(crate) fn to_xml(&self) -> String {
        format!(
            r#"<met:DeployOptions>
            <met:allowMissingFiles>{}</met:allowMissingFiles>
            <met:autoUpdatePackage>{}</met:autoUpdatePackage>
            <met:checkOnly>{}</met:checkOnly>
            <met:ignoreWarnings>{}</met:ignoreWarnings>
            <met:performRetrieve>{}</met:performRetrieve>
            <met:purgeOnDelete>{}</met:purgeOnDelete>
            <met:rollbackOnError>{}</met:rollbackOnError>
            <met:singlePackage>{}</met:singlePackage>
         </met:DeployOptions>"#,
            self.allow_missing_files,
            self.auto_update_package,
            self.check_only,
            self.ignore_warnings,
            self.perform_retrieve,
            self.purge_on_delete,
            self.rollback_on_error,
            self.single_package,
        )
    }
}

/// Build the `deploy` SOAP envelope.
pub(crate) fn deploy_envelope(session_id: &str, base64_zip: &str, options: &DeployOptions) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:met="http://soap.sforce.com/2006/04/metadata">
   <soapenv:Header>
      <met:SessionHeader>
         <met:sessionId>{session_id}</met:sessionId>
      </met:SessionHeader>
   </soapenv:Header>
   <soapenv:Body>
      <met:deploy>
         <met:ZipFile>{zip_file}</met:ZipFile>
         {options}
      </met:deploy>
   </soapenv:Body>
</soapenv:Envelope>"#,
        session_id = xml::escape(session_id),
        zip_file = base64_zip,
        options = options.to_xml(),
    )
}

/// Classified outcome of a deploy call.
///
/// `accepted` only means Salesforce queued the deployment; the job itself
/// runs asynchronously under `async_process_id` and is not polled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResult {
    pub accepted: bool,
    pub http_status: u16,
    pub async_process_id: Option<String>,
    pub fault_code: Option<String>,
    pub fault_message: Option<String>,
}

impl DeployResult {
    pub(crate) fn accepted(http_status: u16, async_process_id: Option<String>) -> Self {
        Self {
            accepted: true,
            http_status,
            async_process_id,
            fault_code: None,
            fault_message: None,
        }
    }

    pub(crate) fn fault(http_status: u16, fault_code: Option<String>, fault_message: String) -> Self {
        Self {
            accepted: false,
            http_status,
            async_process_id: None,
            fault_code,
            fault_message: Some(fault_message),
        }
    }

    /// Turn a rejected deploy into an `HttpFault` error.
    pub fn into_result(self) -> Result<Self> {
        if self.accepted {
            return Ok(self);
        }
        Err(Error::new(ErrorKind::HttpFault {
            status: self.http_status,
            fault_code: self.fault_code,
            fault_message: self
                .fault_message
                .unwrap_or_else(|| format!("HTTP Error {}.", self.http_status)),
        }))
    }
}
