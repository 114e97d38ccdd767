//! SOQL and SOSL tools.

use serde_json::Value;
use tracing::instrument;

use sfmcp_rest::{EvictionPolicy, SalesforceSession};

use super::{arg_str, SalesforceTools, CONNECTION_NOT_ESTABLISHED};

impl<S: SalesforceSession, P: EvictionPolicy> SalesforceTools<S, P> {
    /// Run a SOQL query and return every record, all pages merged.
    #[instrument(skip(self, args))]
    pub async fn run_soql_query(&self, args: &Value) -> String {
        let Some(soql) = arg_str(args, "query") else {
            return "Missing 'query' argument".to_string();
        };
        if !self.session.is_valid() {
            return CONNECTION_NOT_ESTABLISHED.to_string();
        }

        let pretty = match self.session.query_all(soql).await {
            Ok(result) => serde_json::to_string_pretty(&result),
            Err(e) => return format!("SOQL Error: {}", e),
        };
        match pretty {
            Ok(json) => format!("SOQL Query Results (JSON):\n{}", json),
            Err(e) => format!("SOQL Error: {}", e),
        }
    }

    /// Run a SOSL search.
    #[instrument(skip(self, args))]
    pub async fn run_sosl_search(&self, args: &Value) -> String {
        let Some(sosl) = arg_str(args, "search") else {
            return "Missing 'search' argument".to_string();
        };
        if !self.session.is_valid() {
            return CONNECTION_NOT_ESTABLISHED.to_string();
        }

        let pretty = match self.session.search(sosl).await {
            Ok(result) => serde_json::to_string_pretty(&result),
            Err(e) => return format!("SOSL Error: {}", e),
        };
        match pretty {
            Ok(json) => format!("SOSL Search Results (JSON):\n{}", json),
            Err(e) => format!("SOSL Error: {}", e),
        }
    }
}
