//! Einstein Studio model tool.

use serde_json::Value;
use tracing::instrument;

use sfmcp_metadata::ModelSpec;
use sfmcp_rest::{EvictionPolicy, SalesforceSession};

use super::{SalesforceTools, CONNECTION_INACTIVE};

const MISSING_REQUIRED: &str = "Missing required fields: model_name, description, outcome_field, data_source, and fields are required";

impl<S: SalesforceSession, P: EvictionPolicy> SalesforceTools<S, P> {
    /// Create an Einstein Studio predictive model from an `AppFrameworkTemplateBundle`.
    ///
    /// Unset options default to a binary classification model maximizing a
    /// `true`/`false` outcome with XGBoost.
    #[instrument(skip(self, args))]
    pub async fn create_einstein_model(&self, args: &Value) -> String {
        let spec: ModelSpec = match serde_json::from_value(args.clone()) {
            Ok(spec) => spec,
            Err(e) => return format!("Error creating Einstein Studio model: invalid arguments: {}", e),
        };
        if spec.missing_required() {
            return MISSING_REQUIRED.to_string();
        }
        if !self.session.is_valid() {
            return CONNECTION_INACTIVE.to_string();
        }

        match self.pipeline.deploy_einstein_model(&spec, &self.session).await {
            Ok(deployment) => {
                let mut text = format!(
                    "Einstein Studio model '{}' creation package prepared and deployment initiated.",
                    spec.model_name
                );
                if let Some(id) = &deployment.result.async_process_id {
                    text.push_str(&format!(" Async process id: {}.", id));
                }
                text
            }
            Err(e) => format!("Error creating Einstein Studio model: {}", e),
        }
    }
}
