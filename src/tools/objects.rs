//! Custom object tools.

use serde_json::Value;
use tracing::{instrument, warn};

use sfmcp_metadata::{ObjectDeployment, ObjectSpec};
use sfmcp_rest::{EvictionPolicy, SalesforceSession};

use super::{SalesforceTools, CONNECTION_INACTIVE};

impl<S: SalesforceSession, P: EvictionPolicy> SalesforceTools<S, P> {
    /// Create a custom object with no fields beyond its name field.
    ///
    /// Arguments: `name`, `plural_name`, `api_name` and an optional `description`.
    #[instrument(skip(self, args))]
    pub async fn create_object(&self, args: &Value) -> String {
        let mut spec = match parse_spec(args) {
            Ok(spec) => spec,
            Err(text) => return text,
        };
        if !spec.fields.is_empty() {
            warn!(api_name = %spec.api_name, "create_object ignores fields; use create_object_with_fields");
            spec.fields.clear();
        }
        self.deploy_object(&spec).await
    }

    /// Create a custom object and its fields.
    #[instrument(skip(self, args))]
    pub async fn create_object_with_fields(&self, args: &Value) -> String {
        let spec = match parse_spec(args) {
            Ok(spec) => spec,
            Err(text) => return text,
        };
        if spec.fields.is_empty() {
            return format!(
                "Custom Object '{}' has no fields. Use create_object to create an object without fields.",
                spec.api_name
            );
        }
        self.deploy_object(&spec).await
    }

    async fn deploy_object(&self, spec: &ObjectSpec) -> String {
        if !self.session.is_valid() {
            return CONNECTION_INACTIVE.to_string();
        }
        match self.pipeline.deploy_custom_object(spec, &self.session).await {
            Ok(deployment) => accepted_text(spec, &deployment),
            Err(e) => format!("Error creating custom object: {}", e),
        }
    }
}

fn parse_spec(args: &Value) -> std::result::Result<ObjectSpec, String> {
    serde_json::from_value(args.clone())
        .map_err(|e| format!("Invalid custom object arguments: {}", e))
}

fn accepted_text(spec: &ObjectSpec, deployment: &ObjectDeployment) -> String {
    let mut text = format!(
        "Custom Object '{}' creation package prepared and deployment initiated.",
        spec.api_name
    );
    if let Some(id) = &deployment.result.async_process_id {
        text.push_str(&format!(" Async process id: {}.", id));
    }
    if !deployment.issues.is_empty() {
        text.push_str("\nBuild issues:");
        for issue in &deployment.issues {
            text.push_str(&format!("\n- {}", issue));
        }
    }
    text
}
