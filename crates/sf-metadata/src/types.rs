//! Input records for the two deployment kinds.
//!
//! These are deserialized straight from tool arguments, so field names
//! follow the wire names callers send (`api_name`, `picklist_values`, ...),
//! with camelCase aliases for the Salesforce-flavoured keys.

use serde::{Deserialize, Serialize};

/// API version written into generated `package.xml` manifests.
pub const PACKAGE_API_VERSION: &str = "63.0";

/// Metadata API version used for the SOAP deploy endpoint.
pub const DEPLOY_API_VERSION: &str = "58.0";

const CUSTOM_SUFFIX: &str = "__c";

// ============================================================================
// Custom objects
// ============================================================================

/// Field type of a custom field.
///
/// Anything not listed here (including `LongText`, which has no dedicated
/// encoding) is emitted as a plain `Number(18, 0)` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
    Lookup,
    LongText,
    Picklist,
    Checkbox,
    #[serde(rename = "URL", alias = "Url")]
    Url,
    #[serde(other)]
    Unknown,
}

/// A custom field to add to a custom object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type", default)]
    pub field_type: Option<FieldType>,
    pub label: String,
    pub api_name: String,
    #[serde(default, alias = "picklistValues")]
    pub picklist_values: Option<Vec<String>>,
    #[serde(default, alias = "referenceTo")]
    pub reference_to: Option<String>,
    #[serde(default, alias = "relationshipLabel")]
    pub relationship_label: Option<String>,
    #[serde(default, alias = "relationshipName")]
    pub relationship_name: Option<String>,
    #[serde(default, alias = "defaultValue")]
    pub default_value: Option<bool>,
}

impl FieldSpec {
    /// Create a field of the given type.
    pub fn new(field_type: FieldType, label: impl Into<String>, api_name: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type),
            label: label.into(),
            api_name: api_name.into(),
            picklist_values: None,
            reference_to: None,
            relationship_label: None,
            relationship_name: None,
            default_value: None,
        }
    }

    pub fn with_picklist_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.picklist_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_reference_to(mut self, target: impl Into<String>) -> Self {
        self.reference_to = Some(target.into());
        self
    }

    pub fn with_relationship(mut self, label: impl Into<String>, name: impl Into<String>) -> Self {
        self.relationship_label = Some(label.into());
        self.relationship_name = Some(name.into());
        self
    }

    pub fn with_default_value(mut self, value: bool) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// A custom object and the fields to create with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSpec {
    pub name: String,
    pub plural_name: String,
    pub api_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl ObjectSpec {
    pub fn new(
        name: impl Into<String>,
        plural_name: impl Into<String>,
        api_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            plural_name: plural_name.into(),
            api_name: api_name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// API names that do not carry the `__c` custom suffix.
    ///
    /// Salesforce rejects these at deploy time; they are reported here so
    /// callers can log them, but the build still proceeds.
    pub fn suffix_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.api_name.ends_with(CUSTOM_SUFFIX) {
            warnings.push(format!(
                "object api_name '{}' does not end with {}",
                self.api_name, CUSTOM_SUFFIX
            ));
        }
        for field in &self.fields {
            if !field.api_name.ends_with(CUSTOM_SUFFIX) {
                warnings.push(format!(
                    "field api_name '{}' does not end with {}",
                    field.api_name, CUSTOM_SUFFIX
                ));
            }
        }
        warnings
    }
}

// ============================================================================
// Einstein Studio models
// ============================================================================

macro_rules! display_as_str {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Prediction capability of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelCapability {
    #[default]
    BinaryClassification,
    Regression,
    MultiClassification,
}

display_as_str!(ModelCapability {
    BinaryClassification => "BinaryClassification",
    Regression => "Regression",
    MultiClassification => "MultiClassification",
});

impl ModelCapability {
    /// Outcome type written into the model setup.
    pub fn outcome_type(&self) -> &'static str {
        match self {
            ModelCapability::BinaryClassification => "Binary",
            _ => "Regression",
        }
    }
}

/// Optimization direction for the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Goal {
    #[default]
    Maximize,
    Minimize,
}

display_as_str!(Goal {
    Maximize => "Maximize",
    Minimize => "Minimize",
});

/// Training algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlgorithmType {
    #[default]
    #[serde(rename = "XGBoost")]
    XgBoost,
    LinearRegression,
    LogisticRegression,
}

display_as_str!(AlgorithmType {
    XgBoost => "XGBoost",
    LinearRegression => "LinearRegression",
    LogisticRegression => "LogisticRegression",
});

/// Shape of a model input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelFieldType {
    #[default]
    Text,
    Number,
    #[serde(other)]
    Other,
}

/// Statistical data type of a model input field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    #[default]
    Categorical,
    Numerical,
    Other(String),
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Categorical" => DataType::Categorical,
            "Numerical" => DataType::Numerical,
            _ => DataType::Other(value),
        }
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.as_str().to_string()
    }
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Categorical => "Categorical",
            DataType::Numerical => "Numerical",
            DataType::Other(other) => other,
        }
    }
}

/// An input field of an Einstein Studio model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFieldSpec {
    pub field_name: String,
    pub field_label: String,
    #[serde(default)]
    pub field_type: ModelFieldType,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub ignored: bool,
}

impl ModelFieldSpec {
    pub fn new(
        field_name: impl Into<String>,
        field_label: impl Into<String>,
        field_type: ModelFieldType,
    ) -> Self {
        let data_type = match field_type {
            ModelFieldType::Number => DataType::Numerical,
            _ => DataType::Categorical,
        };
        Self {
            field_name: field_name.into(),
            field_label: field_label.into(),
            field_type,
            data_type,
            ignored: false,
        }
    }
}

fn default_success_value() -> String {
    "true".to_string()
}

fn default_failure_value() -> String {
    "false".to_string()
}

/// An Einstein Studio predictive model definition.
///
/// The five required text fields default to empty during deserialization so
/// that [`ModelSpec::missing_required`] can report them together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub model_capability: ModelCapability,
    #[serde(default)]
    pub outcome_field: String,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub data_source: String,
    #[serde(default = "default_success_value")]
    pub success_value: String,
    #[serde(default = "default_failure_value")]
    pub failure_value: String,
    #[serde(default)]
    pub algorithm_type: AlgorithmType,
    #[serde(default)]
    pub fields: Vec<ModelFieldSpec>,
}

impl ModelSpec {
    pub fn new(
        model_name: impl Into<String>,
        description: impl Into<String>,
        outcome_field: impl Into<String>,
        data_source: impl Into<String>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            description: description.into(),
            model_capability: ModelCapability::default(),
            outcome_field: outcome_field.into(),
            goal: Goal::default(),
            data_source: data_source.into(),
            success_value: default_success_value(),
            failure_value: default_failure_value(),
            algorithm_type: AlgorithmType::default(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: ModelFieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// True when any of the required inputs is empty.
    pub fn missing_required(&self) -> bool {
        self.model_name.trim().is_empty()
            || self.description.trim().is_empty()
            || self.outcome_field.trim().is_empty()
            || self.data_source.trim().is_empty()
            || self.fields.is_empty()
    }

    /// Bundle name derived from the model name.
    ///
    /// Spaces, hyphens and any other character outside `[A-Za-z0-9_]` become
    /// `_`. A name that would not start with a letter gets a `Model_` prefix.
    pub fn template_name(&self) -> String {
        let name: String = self
            .model_name
            .trim()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();
        if name.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
            name
        } else {
            format!("Model_{name}")
        }
    }
}
