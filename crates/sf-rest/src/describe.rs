//! Describe types.
//!
//! The subset of the sObject describe payload that the read-path tools
//! consume. Unknown keys in the server response are ignored.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ============================================================================
// Describe SObject Types
// ============================================================================

/// SObject describe result from the Salesforce API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DescribeSObjectResult {
    // === Identity ===
    pub name: String,
    pub label: String,
    #[serde(rename = "labelPlural")]
    pub label_plural: Option<String>,
    #[serde(rename = "keyPrefix")]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub custom: bool,

    // === Capabilities (CRUD) ===
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub updateable: bool,

    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
}

impl DescribeSObjectResult {
    /// Reference fields that point at least at one other object.
    pub fn reference_fields(&self) -> impl Iterator<Item = &FieldDescribe> {
        self.fields.iter().filter(|f| f.is_reference())
    }

    /// Picklist and multi-select picklist fields that carry values.
    pub fn picklist_fields(&self) -> impl Iterator<Item = &FieldDescribe> {
        self.fields.iter().filter(|f| f.is_picklist())
    }
}

/// Field metadata from a describe result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldDescribe {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub length: Option<i32>,
    pub custom: Option<bool>,

    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    /// Salesforce omits this for some system fields; absent means nullable.
    #[serde(default = "default_true")]
    pub nillable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(rename = "externalId", default)]
    pub external_id: bool,

    #[serde(rename = "referenceTo", default)]
    pub reference_to: Option<Vec<String>>,
    #[serde(rename = "relationshipName")]
    pub relationship_name: Option<String>,

    #[serde(rename = "picklistValues", default)]
    pub picklist_values: Option<Vec<PicklistValue>>,
}

impl FieldDescribe {
    /// `reference` field with a non-empty `referenceTo`.
    pub fn is_reference(&self) -> bool {
        self.field_type == "reference"
            && self.reference_to.as_ref().is_some_and(|targets| !targets.is_empty())
    }

    /// `picklist` / `multipicklist` field with at least one value.
    pub fn is_picklist(&self) -> bool {
        matches!(self.field_type.as_str(), "picklist" | "multipicklist")
            && self.picklist_values.as_ref().is_some_and(|values| !values.is_empty())
    }
}

/// Picklist value for picklist fields.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PicklistValue {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "defaultValue", default)]
    pub default_value: bool,
    #[serde(rename = "validFor")]
    pub valid_for: Option<String>,
}
