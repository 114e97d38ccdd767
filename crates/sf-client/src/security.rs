//! Escaping and validation helpers for values that end up inside URLs,
//! XML descriptors and JSON descriptors.
//!
//! Every caller-supplied string that is spliced into a metadata template or
//! a request path MUST go through one of these helpers first.
//!
//! ```rust
//! use sfmcp_client::security::{json, xml};
//!
//! let label = xml::escape("Terms & Conditions");
//! assert_eq!(label, "Terms &amp; Conditions");
//!
//! let description = json::escape("says \"hi\"");
//! assert_eq!(description, "says \\\"hi\\\"");
//! ```

/// API-name validation for sObjects and fields.
pub mod soql {
    /// Validate that an API name contains only safe characters.
    ///
    /// API names start with a letter and contain only ASCII alphanumerics
    /// and underscores (which covers the `__c` / `__r` suffixes).
    ///
    /// ```rust
    /// use sfmcp_client::security::soql;
    ///
    /// assert!(soql::is_safe_api_name("Account"));
    /// assert!(soql::is_safe_api_name("Invoice_Line__c"));
    /// assert!(!soql::is_safe_api_name("Bad'; DROP--"));
    /// assert!(!soql::is_safe_api_name("../sobjects"));
    /// ```
    #[must_use]
    pub fn is_safe_api_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Validate that a SObject name is safe to place in a REST path.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_api_name(name)
    }
}

/// URL encoding utilities for parameter safety.
pub mod url {
    /// URL-encode a parameter value.
    ///
    /// ```rust
    /// use sfmcp_client::security::url;
    ///
    /// assert_eq!(url::encode_param("SELECT Id FROM Account"), "SELECT%20Id%20FROM%20Account");
    /// ```
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }
}

/// XML escaping utilities for SOAP envelopes and metadata descriptors.
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// This escapes the five predefined XML entities.
    ///
    /// ```rust
    /// use sfmcp_client::security::xml;
    ///
    /// let safe = xml::escape("Hello <World> & 'Friends'");
    /// assert_eq!(safe, "Hello &lt;World&gt; &amp; &apos;Friends&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}

/// JSON string-literal escaping for values placed between quotes in a
/// JSON template.
pub mod json {
    /// Escape a string so it can sit inside an existing `"..."` literal.
    ///
    /// The surrounding quotes are not added.
    #[must_use]
    pub fn escape(value: &str) -> String {
        let quoted = serde_json::Value::from(value).to_string();
        quoted[1..quoted.len() - 1].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_api_name() {
        assert!(soql::is_safe_api_name("Account"));
        assert!(soql::is_safe_api_name("Custom_Field__c"));
        assert!(soql::is_safe_api_name("Parent__r"));
        assert!(!soql::is_safe_api_name(""));
        assert!(!soql::is_safe_api_name("1Account"));
        assert!(!soql::is_safe_api_name("_Account"));
        assert!(!soql::is_safe_api_name("Account/describe"));
        assert!(!soql::is_safe_api_name("Name; DELETE"));
    }

    #[test]
    fn test_encode_param() {
        assert_eq!(url::encode_param("a b&c"), "a%20b%26c");
        assert_eq!(url::encode_param("FIND {Acme}"), "FIND%20%7BAcme%7D");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml::escape("plain"), "plain");
        assert_eq!(
            xml::escape("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_json_escape_round_trips_through_parser() {
        let raw = "Quote \" backslash \\ newline \n tab \t bell \u{7}";
        let literal = format!("\"{}\"", json::escape(raw));
        let parsed: String = serde_json::from_str(&literal).unwrap();
        assert_eq!(parsed, raw);
    }

    #[test]
    fn test_json_escape_leaves_unicode_alone() {
        assert_eq!(json::escape("Prévision \"EU\""), "Prévision \\\"EU\\\"");
    }
}
