use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    between, read_log, Harness, ACCEPTED, DEPLOY_PATH, INVALID_SESSION, SESSION_ID,
};

async fn mount_accepting(harness: &Harness) {
    Mock::given(method("POST"))
        .and(path(DEPLOY_PATH))
        .and(header("SOAPAction", "\"\""))
        .and(body_string_contains(format!(
            "<met:sessionId>{}</met:sessionId>",
            SESSION_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCEPTED))
        .expect(1)
        .mount(&harness.server)
        .await;
}

#[tokio::test]
async fn invoice_with_picklist_deploys_object_profile_and_manifest() {
    let harness = Harness::start().await;
    mount_accepting(&harness).await;

    let args = json!({
        "name": "Invoice",
        "plural_name": "Invoices",
        "api_name": "Invoice__c",
        "description": "Billing & collections",
        "fields": [
            {"type": "Picklist", "label": "Status", "api_name": "Status__c",
             "picklist_values": ["Open", "Closed"]},
            {"type": "Lookup", "label": "Account", "api_name": "Account__c",
             "referenceTo": "Account", "relationshipName": "Invoices"},
            {"type": "Checkbox", "label": "Paid", "api_name": "Paid__c", "defaultValue": true}
        ]
    });
    let text = harness
        .tools
        .call("create_object_with_fields", &args)
        .await
        .unwrap();
    assert_eq!(
        text,
        "Custom Object 'Invoice__c' creation package prepared and deployment initiated. \
         Async process id: 0Af5g00000ABCDeCAA."
    );

    let archive = harness.deployed_archive().await;
    assert_eq!(
        archive.entry_names(),
        vec![
            "objects/Invoice__c.object",
            "package.xml",
            "profiles/Admin.profile"
        ]
    );

    let object = archive.read("objects/Invoice__c.object");
    assert!(object.contains("<description>Billing &amp; collections</description>"));
    assert_eq!(object.matches("<valueSetDefinition>").count(), 1);
    let values = between(&object, "<valueSetDefinition>", "</valueSetDefinition>");
    assert_eq!(values.matches("<value>").count(), 2);
    assert!(values.contains("<fullName>Open</fullName>"));
    assert!(values.contains("<fullName>Closed</fullName>"));
    assert!(object.contains("<referenceTo>Account</referenceTo>"));
    assert!(object.contains("<relationshipName>Invoices</relationshipName>"));
    assert!(object.contains("<defaultValue>true</defaultValue>"));

    let manifest = archive.read("package.xml");
    assert!(manifest.contains("<members>Invoice__c</members>"));
    assert!(manifest.contains("<name>CustomObject</name>"));
    assert!(manifest.contains("<version>63.0</version>"));

    let profile = archive.read("profiles/Admin.profile");
    assert!(profile.contains("<field>Invoice__c.Status__c</field>"));
    assert!(profile.contains("<field>Invoice__c.Paid__c</field>"));

    assert!(archive.envelope.contains("<met:rollbackOnError>true</met:rollbackOnError>"));
    assert!(archive.envelope.contains("<met:checkOnly>false</met:checkOnly>"));
}

#[tokio::test]
async fn deploy_logs_redact_the_session_id() {
    let harness = Harness::start().await;
    mount_accepting(&harness).await;

    harness
        .tools
        .call(
            "create_object",
            &json!({"name": "Invoice", "plural_name": "Invoices", "api_name": "Invoice__c"}),
        )
        .await
        .unwrap();

    let logs = harness.logs_dir();
    let request = read_log(&logs, "deploy_request.log");
    assert!(request.contains("<met:sessionId>[REDACTED]</met:sessionId>"));
    assert!(!request.contains(SESSION_ID));
    assert!(read_log(&logs, "deploy_response.log").contains("0Af5g00000ABCDeCAA"));
    assert!(read_log(&logs, "activity.log").contains("\"api_name\":\"Invoice__c\""));
}

#[tokio::test]
async fn invalid_session_fault_reaches_the_caller() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path(DEPLOY_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string(INVALID_SESSION))
        .expect(1)
        .mount(&harness.server)
        .await;

    let text = harness
        .tools
        .call(
            "create_object",
            &json!({"name": "Invoice", "plural_name": "Invoices", "api_name": "Invoice__c"}),
        )
        .await
        .unwrap();
    assert_eq!(
        text,
        "Error creating custom object: Salesforce deployment API call failed: SOAP Fault: \
         Code='sf:INVALID_SESSION_ID', Message='INVALID_SESSION_ID: Invalid Session ID found \
         in SessionHeader: Illegal Session' (HTTP Status: 500)"
    );
}

#[tokio::test]
async fn non_xml_error_body_is_summarized() {
    let harness = Harness::start().await;
    Mock::given(method("POST"))
        .and(path(DEPLOY_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&harness.server)
        .await;

    let text = harness
        .tools
        .call(
            "create_object",
            &json!({"name": "Invoice", "plural_name": "Invoices", "api_name": "Invoice__c"}),
        )
        .await
        .unwrap();
    assert!(text.starts_with("Error creating custom object: Salesforce deployment API call failed: HTTP Error 503."), "{text}");
    assert!(text.contains("Service Unavailable"));
}

#[tokio::test]
async fn empty_session_never_reaches_the_network() {
    let harness = Harness::start_with_token("").await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCEPTED))
        .expect(0)
        .mount(&harness.server)
        .await;

    let text = harness
        .tools
        .call(
            "create_object",
            &json!({"name": "Invoice", "plural_name": "Invoices", "api_name": "Invoice__c"}),
        )
        .await
        .unwrap();
    assert_eq!(
        text,
        "Salesforce connection is not active. Cannot perform metadata deployment."
    );
    assert!(harness.staged_dirs().is_empty());
}

#[tokio::test]
async fn einstein_model_bundle_layout() {
    let harness = Harness::start().await;
    mount_accepting(&harness).await;

    let args = json!({
        "model_name": "Churn Model",
        "description": "Predicts \"churn\"",
        "outcome_field": "Churned_Flag__c",
        "data_source": "Customer_Home",
        "algorithm_type": "LogisticRegression",
        "fields": [
            {"field_name": "Tenure__c", "field_label": "Tenure", "field_type": "Number",
             "data_type": "Numerical"}
        ]
    });
    let text = harness.tools.call("create_einstein_model", &args).await.unwrap();
    assert!(text.starts_with(
        "Einstein Studio model 'Churn Model' creation package prepared and deployment initiated."
    ));

    let archive = harness.deployed_archive().await;
    assert_eq!(
        archive.entry_names(),
        vec![
            "appTemplates/Churn_Model/ml/containers/ModelContainer.json",
            "appTemplates/Churn_Model/ml/setups/ModelSetup.json",
            "appTemplates/Churn_Model/template-info.json",
            "package.xml"
        ]
    );

    let manifest = archive.read("package.xml");
    assert!(manifest.contains("<members>Churn_Model</members>"));
    assert!(manifest.contains("<name>AppFrameworkTemplateBundle</name>"));

    let setup: Value =
        serde_json::from_str(&archive.read("appTemplates/Churn_Model/ml/setups/ModelSetup.json"))
            .unwrap();
    assert_eq!(setup["description"], "Predicts \"churn\" - Model Setup");
    assert_eq!(setup["algorithm"]["type"], "LogisticRegression");
    assert_eq!(setup["outcome"]["field"]["label"], "Churned Flag");

    let fields = setup["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["name"], "Churned_Flag__c");
    assert_eq!(fields[0]["type"], "Text");
    assert_eq!(fields[1]["type"], "Number");
    assert_eq!(fields[1]["bucketingStrategy"]["type"], "Percentile");
    assert!(fields[1].get("dataType").is_none());
}
