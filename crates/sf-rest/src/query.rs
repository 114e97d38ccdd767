//! SOQL and SOSL result types.

use serde::{Deserialize, Serialize};

/// Result of a SOQL query.
///
/// When produced by [`query_all_pages`](crate::SalesforceRestClient::query_all_pages)
/// the records of every page are merged, `done` is true and
/// `next_records_url` is `None`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize")]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    pub done: bool,

    /// URL to fetch next batch of results.
    #[serde(rename = "nextRecordsUrl", skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,

    /// The records.
    pub records: Vec<T>,
}

/// Result of a SOSL search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult<T> {
    #[serde(rename = "searchRecords")]
    pub search_records: Vec<T>,
}
