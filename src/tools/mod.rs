//! The tool-facing surface.
//!
//! Each tool takes the JSON argument object an MCP `tools/call` carries and
//! returns the text sent back to the caller. Failures inside a tool are
//! reported in that text; only an unknown tool name is an [`Error`].

use serde_json::Value;
use tracing::{info, instrument};

use sfmcp_metadata::MetadataPipeline;
use sfmcp_rest::{EvictionPolicy, FieldMetadataCache, NoEviction, SalesforceSession};

use crate::error::{Error, ErrorKind, Result};

mod einstein;
mod objects;
mod query;
mod schema;

/// Names accepted by [`SalesforceTools::call`].
pub const TOOL_NAMES: &[&str] = &[
    "create_object",
    "create_object_with_fields",
    "create_einstein_model",
    "run_soql_query",
    "run_sosl_search",
    "get_object_fields",
    "describe_object",
];

/// Returned by deployment tools when the session is unusable.
pub const CONNECTION_INACTIVE: &str =
    "Salesforce connection is not active. Cannot perform metadata deployment.";

/// Returned by read-path tools when the session is unusable.
pub const CONNECTION_NOT_ESTABLISHED: &str = "Salesforce connection not established.";

/// The session, the deploy pipeline and the field metadata cache behind the tools.
pub struct SalesforceTools<S, P: EvictionPolicy = NoEviction> {
    session: S,
    pipeline: MetadataPipeline,
    cache: FieldMetadataCache<P>,
}

impl<S: SalesforceSession> SalesforceTools<S> {
    pub fn new(session: S, pipeline: MetadataPipeline) -> Self {
        Self {
            session,
            pipeline,
            cache: FieldMetadataCache::new(),
        }
    }
}

impl<S: SalesforceSession, P: EvictionPolicy> SalesforceTools<S, P> {
    /// Swap in a cache with a different eviction policy.
    pub fn with_cache<Q: EvictionPolicy>(self, cache: FieldMetadataCache<Q>) -> SalesforceTools<S, Q> {
        SalesforceTools {
            session: self.session,
            pipeline: self.pipeline,
            cache,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn pipeline(&self) -> &MetadataPipeline {
        &self.pipeline
    }

    pub fn cache(&self) -> &FieldMetadataCache<P> {
        &self.cache
    }

    /// Run the tool named `tool` with `args`.
    #[instrument(skip(self, args))]
    pub async fn call(&self, tool: &str, args: &Value) -> Result<String> {
        info!("tool call");
        let text = match tool {
            "create_object" => self.create_object(args).await,
            "create_object_with_fields" => self.create_object_with_fields(args).await,
            "create_einstein_model" => self.create_einstein_model(args).await,
            "run_soql_query" => self.run_soql_query(args).await,
            "run_sosl_search" => self.run_sosl_search(args).await,
            "get_object_fields" => self.get_object_fields(args).await,
            "describe_object" => self.describe_object(args).await,
            other => return Err(Error::new(ErrorKind::UnknownTool(other.to_string()))),
        };
        Ok(text)
    }
}

/// A non-empty string argument.
fn arg_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) mod testing {
    //! A canned in-memory session for tool tests.

    use serde_json::{json, Value};

    use sfmcp_auth::Credentials;
    use sfmcp_rest::{
        DescribeSObjectResult, Error as RestError, ErrorKind as RestErrorKind, QueryResult,
        Result as RestResult, SalesforceSession, SearchResult,
    };

    pub struct MockSession {
        pub instance_url: String,
        pub token: String,
        pub describe_calls: std::sync::atomic::AtomicUsize,
    }

    impl MockSession {
        pub fn connected() -> Self {
            Self {
                instance_url: "https://acme.my.salesforce.com".to_string(),
                token: "00Dxx!session".to_string(),
                describe_calls: Default::default(),
            }
        }

        pub fn disconnected() -> Self {
            Self {
                token: String::new(),
                ..Self::connected()
            }
        }
    }

    impl Credentials for MockSession {
        fn instance_url(&self) -> &str {
            &self.instance_url
        }

        fn access_token(&self) -> &str {
            &self.token
        }

        fn api_version(&self) -> &str {
            "62.0"
        }
    }

    pub fn account_describe() -> DescribeSObjectResult {
        serde_json::from_value(json!({
            "name": "Account",
            "label": "Account",
            "labelPlural": "Accounts",
            "keyPrefix": "001",
            "custom": false,
            "createable": true,
            "updateable": true,
            "deletable": true,
            "fields": [
                {"name": "Id", "label": "Account ID", "type": "id", "nillable": false},
                {"name": "Name", "label": "Account Name", "type": "string", "nillable": false},
                {"name": "ParentId", "label": "Parent Account ID", "type": "reference",
                 "referenceTo": ["Account"], "relationshipName": "Parent"},
                {"name": "Rating", "label": "Rating", "type": "picklist",
                 "picklistValues": [
                    {"value": "Hot", "label": "Hot", "active": true, "defaultValue": true},
                    {"value": "Cold", "label": "Cold", "active": true, "defaultValue": false}
                 ]}
            ]
        }))
        .unwrap()
    }

    impl SalesforceSession for MockSession {
        async fn query_all(&self, soql: &str) -> RestResult<QueryResult<Value>> {
            if soql.contains("FROM Nowhere") {
                return Err(RestError::new(RestErrorKind::Client(
                    "INVALID_TYPE: sObject type 'Nowhere' is not supported".to_string(),
                )));
            }
            Ok(QueryResult {
                total_size: 1,
                done: true,
                next_records_url: None,
                records: vec![json!({"Id": "001A", "Name": "Acme"})],
            })
        }

        async fn search(&self, _sosl: &str) -> RestResult<SearchResult<Value>> {
            Ok(SearchResult {
                search_records: vec![json!({"Id": "003A"})],
            })
        }

        async fn describe(&self, object_name: &str) -> RestResult<DescribeSObjectResult> {
            self.describe_calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match object_name {
                "Account" => Ok(account_describe()),
                other => Err(RestError::new(RestErrorKind::NotFound(other.to_string()))),
            }
        }
    }
}
