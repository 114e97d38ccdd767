use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{Harness, SESSION_ID};

fn invoice_describe() -> Value {
    json!({
        "name": "Invoice__c",
        "label": "Invoice",
        "labelPlural": "Invoices",
        "keyPrefix": "a01",
        "custom": true,
        "createable": true,
        "updateable": true,
        "deletable": false,
        "fields": [
            {"name": "Id", "label": "Record ID", "type": "id", "nillable": false,
             "createable": false, "updateable": false},
            {"name": "Status__c", "label": "Status", "type": "picklist", "nillable": true,
             "picklistValues": [
                {"value": "Open", "label": "Open", "active": true, "defaultValue": true},
                {"value": "Closed", "label": "Closed", "active": true, "defaultValue": false}
             ]},
            {"name": "Account__c", "label": "Account", "type": "reference",
             "referenceTo": ["Account"], "relationshipName": null},
            {"name": "Number__c", "label": "Number", "type": "string", "length": 40,
             "unique": true, "externalId": true, "nillable": false}
        ]
    })
}

async fn mount_describe(harness: &Harness, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(harness.rest_path("sobjects/Invoice__c/describe")))
        .and(header("Authorization", format!("Bearer {}", SESSION_ID).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(invoice_describe()))
        .expect(expected_calls)
        .mount(&harness.server)
        .await;
}

#[tokio::test]
async fn soql_query_merges_pages() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(harness.rest_path("query")))
        .and(query_param("q", "SELECT Id FROM Invoice__c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": false,
            "nextRecordsUrl": "/services/data/v62.0/query/01gxx-2000",
            "records": [{"Id": "a01A"}]
        })))
        .mount(&harness.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query/01gxx-2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 2,
            "done": true,
            "records": [{"Id": "a01B"}]
        })))
        .mount(&harness.server)
        .await;

    let text = harness
        .tools
        .call("run_soql_query", &json!({"query": "SELECT Id FROM Invoice__c"}))
        .await
        .unwrap();

    let body = text.strip_prefix("SOQL Query Results (JSON):\n").unwrap();
    let result: Value = serde_json::from_str(body).unwrap();
    assert_eq!(result["totalSize"], 2);
    assert_eq!(result["done"], true);
    assert_eq!(result["records"].as_array().unwrap().len(), 2);
    assert_eq!(result["records"][1]["Id"], "a01B");
}

#[tokio::test]
async fn soql_error_is_reported_in_text() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(harness.rest_path("query")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([
            {"errorCode": "MALFORMED_QUERY", "message": "unexpected token: FORM"}
        ])))
        .mount(&harness.server)
        .await;

    let text = harness
        .tools
        .call("run_soql_query", &json!({"query": "SELECT Id FORM Account"}))
        .await
        .unwrap();
    assert!(text.starts_with("SOQL Error: "), "{text}");
    assert!(text.contains("MALFORMED_QUERY"));
}

#[tokio::test]
async fn sosl_search() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(harness.rest_path("search")))
        .and(query_param("q", "FIND {Acme} IN ALL FIELDS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchRecords": [{"attributes": {"type": "Account"}, "Id": "001A"}]
        })))
        .mount(&harness.server)
        .await;

    let text = harness
        .tools
        .call("run_sosl_search", &json!({"search": "FIND {Acme} IN ALL FIELDS"}))
        .await
        .unwrap();
    let body = text.strip_prefix("SOSL Search Results (JSON):\n").unwrap();
    let result: Value = serde_json::from_str(body).unwrap();
    assert_eq!(result["searchRecords"][0]["Id"], "001A");
}

#[tokio::test]
async fn object_fields_are_described_once() {
    let harness = Harness::start().await;
    mount_describe(&harness, 1).await;
    let args = json!({"object_name": "Invoice__c"});

    let first = harness.tools.call("get_object_fields", &args).await.unwrap();
    let second = harness.tools.call("get_object_fields", &args).await.unwrap();
    assert_eq!(first, second);

    let body = first
        .strip_prefix("Invoice__c Fields Metadata (JSON):\n")
        .unwrap();
    let metadata: Value = serde_json::from_str(body).unwrap();
    assert_eq!(metadata["objectName"], "Invoice__c");
    assert_eq!(metadata["objectInfo"]["labelPlural"], "Invoices");
    assert_eq!(metadata["objectInfo"]["deletable"], false);

    let fields = metadata["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0]["required"], true);
    assert_eq!(fields[1]["picklistValues"].as_array().unwrap().len(), 2);
    assert_eq!(fields[2]["referenceTo"], json!(["Account"]));
    assert!(fields[2]["relationshipName"].is_null());
    assert!(fields[2].as_object().unwrap().contains_key("relationshipName"));
    assert!(fields[3].get("picklistValues").is_none());

    let stats = harness.tools.cache().stats();
    assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
}

#[tokio::test]
async fn missing_object_is_not_cached() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(harness.rest_path("sobjects/Nope__c/describe")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!([
            {"errorCode": "NOT_FOUND", "message": "The requested resource does not exist"}
        ])))
        .expect(2)
        .mount(&harness.server)
        .await;

    for _ in 0..2 {
        let text = harness
            .tools
            .call("get_object_fields", &json!({"object_name": "Nope__c"}))
            .await
            .unwrap();
        assert_eq!(
            text,
            "Error getting fields for Nope__c: Object 'Nope__c' not found or not accessible."
        );
    }
    assert!(harness.tools.cache().get("Nope__c").is_none());
}

#[tokio::test]
async fn describe_object_markdown() {
    let harness = Harness::start().await;
    mount_describe(&harness, 1).await;

    let text = harness
        .tools
        .call("describe_object", &json!({"object_name": "Invoice__c"}))
        .await
        .unwrap();

    assert!(text.starts_with(
        "## Invoice (Invoice__c)\n\n**Type:** Custom Object\n**API Name:** Invoice__c\n\
         **Label:** Invoice\n**Plural Label:** Invoices\n**Key Prefix:** a01\n"
    ));
    assert!(text.contains("| Number__c | Number | string | Yes | Yes | Yes |\n"));
    assert!(text.contains("| Account__c | Account | reference | No | No | No |\n"));
    assert!(text.contains("| Account__c | Account | N/A |\n"));
    assert!(text.contains("### Status (Status__c)\n\n"));
    assert!(text.contains("| Open | Open | Yes |\n| Closed | Closed | No |\n"));
}

#[tokio::test]
async fn missing_arguments_are_reported() {
    let harness = Harness::start().await;
    let cases = [
        ("run_soql_query", "Missing 'query' argument"),
        ("run_sosl_search", "Missing 'search' argument"),
        ("get_object_fields", "Missing 'object_name' argument"),
        ("describe_object", "Missing 'object_name' argument"),
    ];
    for (tool, expected) in cases {
        let text = harness.tools.call(tool, &json!({})).await.unwrap();
        assert_eq!(text, expected, "{tool}");
    }
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_tool() {
    let harness = Harness::start().await;
    let err = harness
        .tools
        .call("delete_everything", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown tool: delete_everything");
}
