//! Named text templates with `##key##` placeholders.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

const MARKER: &str = "##";
const TEMPLATE_EXTENSION: &str = "tmpl";

/// Stable names of the built-in templates.
pub mod names {
    pub const OBJECT: &str = "object";
    pub const FIELD: &str = "field";
    pub const PROFILE: &str = "profile";
    pub const PACKAGE: &str = "package";
    pub const EINSTEIN_TEMPLATE_INFO: &str = "einstein/template-info";
    pub const EINSTEIN_MODEL_CONTAINER: &str = "einstein/model-container";
    pub const EINSTEIN_MODEL_SETUP: &str = "einstein/model-setup";

    pub const ALL: [&str; 7] = [
        OBJECT,
        FIELD,
        PROFILE,
        PACKAGE,
        EINSTEIN_TEMPLATE_INFO,
        EINSTEIN_MODEL_CONTAINER,
        EINSTEIN_MODEL_SETUP,
    ];
}

/// Placeholder values for one render.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Substitutions::new();
        for (key, value) in iter {
            subs.insert(key, value);
        }
        subs
    }
}

/// Output of a substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholder keys left in the output, in order of first appearance.
    pub unresolved: Vec<String>,
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace `##key##` markers in one left-to-right pass.
///
/// Inserted values are never rescanned. Markers whose key is not supplied
/// are copied through unchanged and listed in [`Rendered::unresolved`].
pub fn substitute(text: &str, subs: &Substitutions) -> Rendered {
    let mut out = String::with_capacity(text.len());
    let mut unresolved: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(MARKER) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MARKER.len()..];
        match after.find(MARKER) {
            Some(end) if is_placeholder_key(&after[..end]) => {
                let key = &after[..end];
                match subs.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str(MARKER);
                        out.push_str(key);
                        out.push_str(MARKER);
                        if !unresolved.iter().any(|k| k == key) {
                            unresolved.push(key.to_string());
                        }
                    }
                }
                rest = &after[end + MARKER.len()..];
            }
            _ => {
                out.push('#');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);

    Rendered {
        text: out,
        unresolved,
    }
}

/// A set of named templates.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    sources: HashMap<String, Cow<'static, str>>,
}

impl Templates {
    /// An empty set; every lookup fails with `TemplateNotFound`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The templates compiled into the crate.
    pub fn embedded() -> Self {
        let builtin: [(&str, &'static str); 7] = [
            (names::OBJECT, include_str!("../templates/object.tmpl")),
            (names::FIELD, include_str!("../templates/field.tmpl")),
            (names::PROFILE, include_str!("../templates/profile.tmpl")),
            (names::PACKAGE, include_str!("../templates/package.tmpl")),
            (
                names::EINSTEIN_TEMPLATE_INFO,
                include_str!("../templates/einstein/template-info.tmpl"),
            ),
            (
                names::EINSTEIN_MODEL_CONTAINER,
                include_str!("../templates/einstein/model-container.tmpl"),
            ),
            (
                names::EINSTEIN_MODEL_SETUP,
                include_str!("../templates/einstein/model-setup.tmpl"),
            ),
        ];
        Self {
            sources: builtin
                .into_iter()
                .map(|(name, source)| (name.to_string(), Cow::Borrowed(source)))
                .collect(),
        }
    }

    /// Load `<dir>/<name>.tmpl` for each known template name that exists.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::new(ErrorKind::Config(format!(
                "template directory {} does not exist",
                dir.display()
            ))));
        }

        let mut templates = Self::empty();
        for name in names::ALL {
            let path = dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION));
            if path.is_file() {
                debug!(template = name, path = %path.display(), "loading template override");
                templates.insert(name, std::fs::read_to_string(&path)?);
            }
        }
        Ok(templates)
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.sources
            .insert(name.into(), Cow::Owned(source.into()));
    }

    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.sources
            .get(name)
            .map(|source| source.as_ref())
            .ok_or_else(|| Error::new(ErrorKind::TemplateNotFound(name.to_string())))
    }

    /// Render a template, leaving unknown placeholders in place.
    pub fn render(&self, name: &str, subs: &Substitutions) -> Result<String> {
        Ok(substitute(self.get(name)?, subs).text)
    }

    /// Render a template, failing if any placeholder is left unresolved.
    pub fn render_strict(&self, name: &str, subs: &Substitutions) -> Result<String> {
        let rendered = substitute(self.get(name)?, subs);
        if rendered.unresolved.is_empty() {
            Ok(rendered.text)
        } else {
            Err(Error::new(ErrorKind::UnresolvedPlaceholder {
                template: name.to_string(),
                placeholders: rendered.unresolved,
            }))
        }
    }
}
