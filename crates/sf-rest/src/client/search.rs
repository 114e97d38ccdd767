use serde::de::DeserializeOwned;
use tracing::instrument;

use sfmcp_client::security::url as url_security;

use crate::error::Result;
use crate::query::SearchResult;

impl super::SalesforceRestClient {
    /// Execute a SOSL search.
    #[instrument(skip(self))]
    pub async fn search<T: DeserializeOwned>(&self, sosl: &str) -> Result<SearchResult<T>> {
        let url = self.rest_url(&format!("search?q={}", url_security::encode_param(sosl)));
        self.get_json(&url).await
    }
}
