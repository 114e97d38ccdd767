//! Schema inspection tools.

use std::fmt;

use serde_json::Value;
use tracing::instrument;

use sfmcp_rest::{DescribeSObjectResult, EvictionPolicy, SalesforceSession};

use super::{arg_str, SalesforceTools, CONNECTION_NOT_ESTABLISHED};

impl<S: SalesforceSession, P: EvictionPolicy> SalesforceTools<S, P> {
    /// Field metadata for an object, served from the cache after the first describe.
    #[instrument(skip(self, args))]
    pub async fn get_object_fields(&self, args: &Value) -> String {
        let Some(object_name) = arg_str(args, "object_name") else {
            return "Missing 'object_name' argument".to_string();
        };
        if !self.session.is_valid() {
            return format!(
                "Error getting fields for {}: {}",
                object_name, CONNECTION_NOT_ESTABLISHED
            );
        }

        let session = &self.session;
        let fields = self
            .cache
            .get_fields(object_name, |name| async move { session.describe(&name).await })
            .await;
        let pretty = match fields {
            Ok(metadata) => serde_json::to_string_pretty(metadata.as_ref()),
            Err(e) => return format!("Error getting fields for {}: {}", object_name, e),
        };
        match pretty {
            Ok(json) => format!("{} Fields Metadata (JSON):\n{}", object_name, json),
            Err(e) => format!("Error getting fields for {}: {}", object_name, e),
        }
    }

    /// Markdown summary of an object: properties, fields, relationships, picklists.
    ///
    /// `include_field_details` (default `true`) controls the tables.
    #[instrument(skip(self, args))]
    pub async fn describe_object(&self, args: &Value) -> String {
        let Some(object_name) = arg_str(args, "object_name") else {
            return "Missing 'object_name' argument".to_string();
        };
        if !self.session.is_valid() {
            return CONNECTION_NOT_ESTABLISHED.to_string();
        }
        let include_field_details = args
            .get("include_field_details")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        match self.session.describe(object_name).await {
            Ok(describe) => render_markdown(&describe, include_field_details),
            Err(e) => format!("Error describing object {}: {}", object_name, e),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn render_markdown(describe: &DescribeSObjectResult, include_field_details: bool) -> String {
    ObjectSummary {
        describe,
        include_field_details,
    }
    .to_string()
}

struct ObjectSummary<'a> {
    describe: &'a DescribeSObjectResult,
    include_field_details: bool,
}

impl fmt::Display for ObjectSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = self.describe;
        writeln!(f, "## {} ({})\n", describe.label, describe.name)?;
        let kind = if describe.custom {
            "Custom Object"
        } else {
            "Standard Object"
        };
        writeln!(f, "**Type:** {}", kind)?;
        writeln!(f, "**API Name:** {}", describe.name)?;
        writeln!(f, "**Label:** {}", describe.label)?;
        writeln!(
            f,
            "**Plural Label:** {}",
            describe.label_plural.as_deref().unwrap_or_default()
        )?;
        writeln!(
            f,
            "**Key Prefix:** {}",
            describe.key_prefix.as_deref().unwrap_or("N/A")
        )?;
        writeln!(f, "**Createable:** {}", describe.createable)?;
        writeln!(f, "**Updateable:** {}", describe.updateable)?;
        writeln!(f, "**Deletable:** {}\n", describe.deletable)?;

        if !self.include_field_details {
            return Ok(());
        }

        f.write_str("## Fields\n\n")?;
        f.write_str("| API Name | Label | Type | Required | Unique | External ID |\n")?;
        f.write_str("|----------|-------|------|----------|--------|------------|\n")?;
        for field in &describe.fields {
            writeln!(
                f,
                "| {} | {} | {} | {} | {} | {} |",
                field.name,
                field.label,
                field.field_type,
                yes_no(!field.nillable),
                yes_no(field.unique),
                yes_no(field.external_id)
            )?;
        }

        let mut references = describe.reference_fields().peekable();
        if references.peek().is_some() {
            f.write_str("\n## Relationship Fields\n\n")?;
            f.write_str("| API Name | Related To | Relationship Name |\n")?;
            f.write_str("|----------|-----------|-------------------|\n")?;
            for field in references {
                let related_to = field.reference_to.as_deref().unwrap_or_default().join(", ");
                writeln!(
                    f,
                    "| {} | {} | {} |",
                    field.name,
                    related_to,
                    field.relationship_name.as_deref().unwrap_or("N/A")
                )?;
            }
        }

        let mut picklists = describe.picklist_fields().peekable();
        if picklists.peek().is_some() {
            f.write_str("\n## Picklist Fields\n\n")?;
            for field in picklists {
                writeln!(f, "### {} ({})\n", field.label, field.name)?;
                f.write_str("| Value | Label | Default |\n")?;
                f.write_str("|-------|-------|--------|\n")?;
                for value in field.picklist_values.as_deref().unwrap_or_default() {
                    writeln!(
                        f,
                        "| {} | {} | {} |",
                        value.value,
                        value.label,
                        yes_no(value.default_value)
                    )?;
                }
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
