//! Package manifest (`package.xml`).

use sfmcp_client::security::xml;

use crate::error::Result;
use crate::template::{names, Substitutions, Templates};

/// Metadata type names used by the generated manifests.
pub mod metadata_types {
    pub const CUSTOM_OBJECT: &str = "CustomObject";
    pub const PROFILE: &str = "Profile";
    pub const APP_TEMPLATE_BUNDLE: &str = "AppFrameworkTemplateBundle";
}

/// Package manifest.
///
/// All names and members are XML-escaped when rendered.
#[derive(Debug, Clone, Default)]
pub struct PackageManifest {
    pub types: Vec<PackageTypeMembers>,
    pub version: String,
}

impl PackageManifest {
    /// Create a new package manifest with the given API version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            version: version.into(),
        }
    }

    /// Add a metadata type with its members.
    pub fn add_type<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.push(PackageTypeMembers {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// The `<types>` blocks, one per metadata type.
    pub fn types_xml(&self) -> String {
        self.types
            .iter()
            .map(|type_members| {
                let members: String = type_members
                    .members
                    .iter()
                    .map(|m| format!("        <members>{}</members>\n", xml::escape(m)))
                    .collect();
                format!(
                    "    <types>\n{}        <name>{}</name>\n    </types>",
                    members,
                    xml::escape(&type_members.name)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the full `package.xml` through the `package` template.
    pub fn render(&self, templates: &Templates) -> Result<String> {
        let subs = Substitutions::new()
            .with("types", self.types_xml())
            .with("version", xml::escape(&self.version));
        templates.render_strict(names::PACKAGE, &subs)
    }
}

/// Type members in a package manifest.
#[derive(Debug, Clone)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manifest_render() {
        let manifest = PackageManifest::new("63.0")
            .add_type(metadata_types::CUSTOM_OBJECT, ["Invoice__c"])
            .add_type(metadata_types::PROFILE, ["Admin"]);

        let xml = manifest.render(&Templates::embedded()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<members>Invoice__c</members>"));
        assert!(xml.contains("<name>CustomObject</name>"));
        assert!(xml.contains("<members>Admin</members>"));
        assert!(xml.contains("<name>Profile</name>"));
        assert!(xml.contains("<version>63.0</version>"));
        assert!(!xml.contains("##"));
    }

    #[test]
    fn test_package_manifest_escapes_xml_injection() {
        let manifest = PackageManifest::new("63.0").add_type(
            metadata_types::CUSTOM_OBJECT,
            ["</members><malicious>attack</malicious><members>"],
        );

        let xml = manifest.types_xml();
        assert!(xml.contains("&lt;/members&gt;"));
        assert!(!xml.contains("<malicious>"));
    }
}
