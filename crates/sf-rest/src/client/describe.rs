use tracing::instrument;

use sfmcp_client::security::soql;

use crate::describe::DescribeSObjectResult;
use crate::error::{Error, ErrorKind, Result};

impl super::SalesforceRestClient {
    /// Describe an SObject (fields, labels, CRUD capabilities).
    #[instrument(skip(self))]
    pub async fn describe_sobject(&self, sobject: &str) -> Result<DescribeSObjectResult> {
        if !soql::is_safe_sobject_name(sobject) {
            return Err(Error::new(ErrorKind::InvalidName(sobject.to_string())));
        }
        let url = self.rest_url(&format!("sobjects/{}/describe", sobject));
        self.get_json(&url).await
    }
}
