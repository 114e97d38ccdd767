//! Field encoders.
//!
//! Custom fields become XML fragments spliced into the object descriptor.
//! Einstein model fields become entries of the model setup `fields` array.

use serde::Serialize;
use sfmcp_client::security::xml;

use crate::error::{Error, ErrorKind, Result};
use crate::types::{FieldSpec, FieldType, ModelFieldSpec, ModelFieldType, ModelSpec};

const TEXT_LENGTH: u32 = 100;
const FRAGMENT_INDENT: &str = "        ";
const NUMBER_BUCKETS: u32 = 10;
const NUMBER_MIN: u64 = 0;
const NUMBER_MAX: u64 = 10_000_000_000;

// ============================================================================
// Custom fields (XML)
// ============================================================================

/// Encode the type-specific part of a custom field definition.
///
/// Unset and unrecognised types fall back to `Number(18, 0)`.
pub fn encode_metadata_field(field: &FieldSpec) -> Result<String> {
    let lines: Vec<String> = match field.field_type {
        Some(FieldType::Text) => vec![
            "<type>Text</type>".to_string(),
            format!("<length>{}</length>", TEXT_LENGTH),
        ],
        Some(FieldType::Url) => vec!["<type>Url</type>".to_string()],
        Some(FieldType::Checkbox) => vec![
            "<type>Checkbox</type>".to_string(),
            format!(
                "<defaultValue>{}</defaultValue>",
                field.default_value.unwrap_or(false)
            ),
        ],
        Some(FieldType::Lookup) => lookup_lines(field)?,
        Some(FieldType::Picklist) => picklist_lines(field)?,
        Some(FieldType::Number)
        | Some(FieldType::LongText)
        | Some(FieldType::Unknown)
        | None => vec![
            "<precision>18</precision>".to_string(),
            "<scale>0</scale>".to_string(),
            "<type>Number</type>".to_string(),
        ],
    };

    Ok(indent(&lines))
}

fn invalid(field: &FieldSpec, reason: &str) -> Error {
    Error::new(ErrorKind::InvalidFieldSpec {
        field: field.api_name.clone(),
        reason: reason.to_string(),
    })
}

fn lookup_lines(field: &FieldSpec) -> Result<Vec<String>> {
    let target = field
        .reference_to
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| invalid(field, "Lookup fields require reference_to"))?;

    let mut lines = vec![
        "<type>Lookup</type>".to_string(),
        format!("<referenceTo>{}</referenceTo>", xml::escape(target)),
    ];
    if let Some(label) = field.relationship_label.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!(
            "<relationshipLabel>{}</relationshipLabel>",
            xml::escape(label)
        ));
    }
    if let Some(name) = field.relationship_name.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!(
            "<relationshipName>{}</relationshipName>",
            xml::escape(name)
        ));
    }
    Ok(lines)
}

fn picklist_lines(field: &FieldSpec) -> Result<Vec<String>> {
    let values = field
        .picklist_values
        .as_ref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid(field, "Picklist fields require picklist_values"))?;

    let mut lines = vec![
        "<type>Picklist</type>".to_string(),
        "<valueSet>".to_string(),
        "    <restricted>true</restricted>".to_string(),
        "    <valueSetDefinition>".to_string(),
        "        <sorted>false</sorted>".to_string(),
    ];
    for value in values {
        let escaped = xml::escape(value);
        lines.push("        <value>".to_string());
        lines.push(format!("            <fullName>{}</fullName>", escaped));
        lines.push("            <default>false</default>".to_string());
        lines.push(format!("            <label>{}</label>", escaped));
        lines.push("        </value>".to_string());
    }
    lines.push("    </valueSetDefinition>".to_string());
    lines.push("</valueSet>".to_string());
    Ok(lines)
}

fn indent(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("{}{}", FRAGMENT_INDENT, line))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Einstein model fields (JSON)
// ============================================================================

/// One entry of the model setup `fields` array.
///
/// Text and Number fields have different shapes, not optional keys of one.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EncodedModelField<'a> {
    Text(TextModelField<'a>),
    Number(NumberModelField<'a>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextModelField<'a> {
    balanced: bool,
    data_type: &'a str,
    high_cardinality: bool,
    ignored: bool,
    include_other: bool,
    label: &'a str,
    name: &'a str,
    ordering: &'static str,
    sensitive: bool,
    source: Option<String>,
    values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberModelField<'a> {
    bucketing_strategy: BucketingStrategy,
    high_cardinality: Option<bool>,
    ignored: bool,
    label: &'a str,
    name: &'a str,
    sensitive: bool,
    source: Option<String>,
    max: u64,
    min: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketingStrategy {
    #[serde(rename = "type")]
    kind: &'static str,
    number_of_buckets: u32,
}

fn text_shape<'a>(name: &'a str, label: &'a str, data_type: &'a str, ignored: bool) -> EncodedModelField<'a> {
    EncodedModelField::Text(TextModelField {
        balanced: false,
        data_type,
        high_cardinality: false,
        ignored,
        include_other: true,
        label,
        name,
        ordering: "Occurrence",
        sensitive: false,
        source: None,
        values: Vec::new(),
    })
}

/// Encode one model input field.
///
/// Unknown field types use the Text shape with a `Categorical` data type.
pub fn encode_model_field(field: &ModelFieldSpec) -> EncodedModelField<'_> {
    match field.field_type {
        ModelFieldType::Text => text_shape(
            &field.field_name,
            &field.field_label,
            field.data_type.as_str(),
            field.ignored,
        ),
        ModelFieldType::Number => EncodedModelField::Number(NumberModelField {
            bucketing_strategy: BucketingStrategy {
                kind: "Percentile",
                number_of_buckets: NUMBER_BUCKETS,
            },
            high_cardinality: None,
            ignored: field.ignored,
            label: &field.field_label,
            name: &field.field_name,
            sensitive: false,
            source: None,
            max: NUMBER_MAX,
            min: NUMBER_MIN,
        }),
        ModelFieldType::Other => {
            text_shape(&field.field_name, &field.field_label, "Categorical", field.ignored)
        }
    }
}

/// Display label for the outcome field: `Is_Churned__c` becomes `Is Churned`.
pub fn outcome_label(outcome_field: &str) -> String {
    outcome_field
        .strip_suffix("__c")
        .unwrap_or(outcome_field)
        .replace('_', " ")
}

/// Encode the full `fields` array: the outcome field first, then each input field.
pub fn encode_model_fields(spec: &ModelSpec) -> Result<String> {
    let label = outcome_label(&spec.outcome_field);
    let mut entries = Vec::with_capacity(spec.fields.len() + 1);
    entries.push(text_shape(&spec.outcome_field, &label, "Categorical", false));
    entries.extend(spec.fields.iter().map(encode_model_field));

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| Error::new(ErrorKind::Json(e.to_string())))
}
