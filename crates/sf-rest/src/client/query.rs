use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use sfmcp_client::security::url as url_security;

use crate::error::Result;
use crate::query::QueryResult;

impl super::SalesforceRestClient {
    /// Execute a SOQL query.
    ///
    /// Returns the first page of results. Use `query_all` for automatic pagination.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let url = self.rest_url(&format!("query?q={}", url_security::encode_param(soql)));
        self.get_json(&url).await
    }

    /// Execute a SOQL query and return all results (automatic pagination).
    #[instrument(skip(self))]
    pub async fn query_all<T: DeserializeOwned>(&self, soql: &str) -> Result<Vec<T>> {
        Ok(self.query_all_pages(soql).await?.records)
    }

    /// Execute a SOQL query, follow every `nextRecordsUrl` and merge the pages.
    #[instrument(skip(self))]
    pub async fn query_all_pages<T: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<T>> {
        let mut result: QueryResult<T> = self.query(soql).await?;
        let mut records = std::mem::take(&mut result.records);
        let total_size = result.total_size;

        while let Some(next_url) = result.next_records_url.take() {
            debug!(next_url = %next_url, fetched = records.len(), "fetching next query page");
            result = self.get_json(&self.absolute_url(&next_url)).await?;
            records.append(&mut result.records);
        }

        Ok(QueryResult {
            total_size,
            done: true,
            next_records_url: None,
            records,
        })
    }
}
