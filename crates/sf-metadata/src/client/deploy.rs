use tracing::{debug, info, instrument, warn};

use sfmcp_auth::Credentials;
use sfmcp_client::{excerpt, MAX_ERROR_TEXT};

use super::xml_helpers::{element_text, parse_soap_fault};
use crate::deploy::{deploy_envelope, DeployResult, REDACTED};
use crate::diagnostics::{DEPLOY_REQUEST_LOG, DEPLOY_RESPONSE_LOG};
use crate::error::Result;

impl super::DeployClient {
    /// Deploy a base64-encoded zip package.
    ///
    /// Fails with `InvalidConnection` before any request when the session
    /// has no session id or instance host, and with `NetworkError` when the
    /// call does not complete. HTTP-level rejections are returned as a
    /// non-accepted [`DeployResult`]; use [`DeployResult::into_result`] to
    /// turn those into errors.
    #[instrument(skip(self, base64_zip, session), fields(zip_len = base64_zip.len()))]
    pub async fn deploy<C: Credentials + ?Sized>(
        &self,
        base64_zip: &str,
        session: &C,
    ) -> Result<DeployResult> {
        let endpoint = self.endpoint_for(session)?;

        if let Some(log) = &self.diagnostics {
            log.write(
                DEPLOY_REQUEST_LOG,
                &deploy_envelope(REDACTED, base64_zip, &self.options),
            );
        }

        debug!(endpoint = %endpoint, "posting deploy request");
        let envelope = deploy_envelope(session.session_id(), base64_zip, &self.options);
        let response = self
            .http_client
            .post(&endpoint)
            .headers(self.build_headers())
            .body(envelope)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if let Some(log) = &self.diagnostics {
            log.write(DEPLOY_RESPONSE_LOG, &body);
        }

        let result = classify_response(status, &body);
        if result.accepted {
            info!(
                status,
                async_process_id = ?result.async_process_id,
                "deploy request accepted"
            );
        } else {
            warn!(
                status,
                fault_code = ?result.fault_code,
                "deploy request rejected"
            );
        }
        Ok(result)
    }
}

/// Classify a deploy response by HTTP status and body.
pub(crate) fn classify_response(status: u16, body: &str) -> DeployResult {
    if status < 400 {
        return DeployResult::accepted(status, element_text(body, "id"));
    }

    match parse_soap_fault(body) {
        Ok(Some(fault)) => DeployResult::fault(status, Some(fault.fault_code), fault.fault_string),
        Ok(None) => DeployResult::fault(
            status,
            None,
            format!(
                "HTTP Error {}. Response Text: {}",
                status,
                excerpt(body, MAX_ERROR_TEXT)
            ),
        ),
        Err(e) => DeployResult::fault(
            status,
            None,
            format!(
                "HTTP Error {}. The response body was not valid XML ({}). Response Text: {}",
                status,
                e,
                excerpt(body, MAX_ERROR_TEXT)
            ),
        ),
    }
}
