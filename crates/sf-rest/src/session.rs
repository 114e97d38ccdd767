//! The Salesforce session capability consumed by the MCP tools.

use std::future::Future;

use serde_json::Value;

use sfmcp_auth::Credentials;

use crate::describe::DescribeSObjectResult;
use crate::error::Result;
use crate::query::{QueryResult, SearchResult};
use crate::SalesforceRestClient;

/// An authenticated org connection.
///
/// Besides the [`Credentials`] (session id, instance host) needed by the
/// metadata deploy path, a session answers the three read-path calls.
/// It is constructed once at startup and shared by reference.
pub trait SalesforceSession: Credentials {
    /// Run a SOQL query and return every page merged into one result.
    fn query_all(&self, soql: &str) -> impl Future<Output = Result<QueryResult<Value>>> + Send;

    /// Run a SOSL search.
    fn search(&self, sosl: &str) -> impl Future<Output = Result<SearchResult<Value>>> + Send;

    /// Describe an sObject by API name.
    fn describe(&self, object_name: &str)
        -> impl Future<Output = Result<DescribeSObjectResult>> + Send;
}

impl SalesforceSession for SalesforceRestClient {
    async fn query_all(&self, soql: &str) -> Result<QueryResult<Value>> {
        self.query_all_pages(soql).await
    }

    async fn search(&self, sosl: &str) -> Result<SearchResult<Value>> {
        SalesforceRestClient::search(self, sosl).await
    }

    async fn describe(&self, object_name: &str) -> Result<DescribeSObjectResult> {
        self.describe_sobject(object_name).await
    }
}

impl<S: SalesforceSession> SalesforceSession for std::sync::Arc<S> {
    fn query_all(&self, soql: &str) -> impl Future<Output = Result<QueryResult<Value>>> + Send {
        (**self).query_all(soql)
    }

    fn search(&self, sosl: &str) -> impl Future<Output = Result<SearchResult<Value>>> + Send {
        (**self).search(sosl)
    }

    fn describe(
        &self,
        object_name: &str,
    ) -> impl Future<Output = Result<DescribeSObjectResult>> + Send {
        (**self).describe(object_name)
    }
}
