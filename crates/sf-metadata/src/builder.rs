//! Staging-directory assembly for the two deployment kinds.
//!
//! Every build gets its own staging directory under
//! `<work_dir>/staging/<kind>-<uuid>`, so concurrent deployments never share
//! files. The custom-object build is best-effort: a failing step is recorded
//! as a [`BuildIssue`] and the remaining steps still run. The Einstein build
//! stops at the first error.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use sfmcp_client::security::{json, soql, xml};

use crate::config::PipelineConfig;
use crate::diagnostics::{DiagnosticLog, BUILD_ERRORS_LOG};
use crate::error::{Error, ErrorKind, Result};
use crate::fields::{encode_metadata_field, encode_model_fields, outcome_label};
use crate::manifest::{metadata_types, PackageManifest};
use crate::packager;
use crate::template::{names, substitute, Substitutions, Templates};
use crate::types::{FieldSpec, ModelSpec, ObjectSpec};

const PACKAGE_PATH: &str = "package.xml";
const OBJECT_DESCRIPTOR_PATH: &str = "objects/##api_name##.object";
const ADMIN_PROFILE_PATH: &str = "profiles/Admin.profile";
const ADMIN_PROFILE: &str = "Admin";
const TEMPLATE_INFO_PATH: &str = "appTemplates/##template_name##/template-info.json";
const MODEL_CONTAINER_PATH: &str = "appTemplates/##template_name##/ml/containers/ModelContainer.json";
const MODEL_SETUP_PATH: &str = "appTemplates/##template_name##/ml/setups/ModelSetup.json";

// ============================================================================
// Build outputs
// ============================================================================

/// What a staged package deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentKind {
    CustomObject,
    EinsteinModel,
}

impl DeploymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentKind::CustomObject => "custom-object",
            DeploymentKind::EinsteinModel => "einstein-model",
        }
    }
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deployable tree on disk.
#[derive(Debug, Clone)]
pub struct StagedPackage {
    pub kind: DeploymentKind,
    pub root: PathBuf,
    /// Files written, relative to `root`.
    pub files: Vec<PathBuf>,
}

impl StagedPackage {
    /// Where the packager writes this tree's archive.
    pub fn zip_path(&self) -> PathBuf {
        packager::zip_path_for(&self.root)
    }

    /// Remove the staging directory and its archive.
    pub fn cleanup(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        let zip_path = self.zip_path();
        if zip_path.exists() {
            std::fs::remove_file(zip_path)?;
        }
        Ok(())
    }
}

/// Step of the custom-object build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStep {
    PrepareStaging,
    EncodeField(String),
    ObjectDescriptor,
    PackageManifest,
    Profile,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::PrepareStaging => f.write_str("prepare staging directory"),
            BuildStep::EncodeField(api_name) => write!(f, "encode field {}", api_name),
            BuildStep::ObjectDescriptor => f.write_str("write object descriptor"),
            BuildStep::PackageManifest => f.write_str("write package.xml"),
            BuildStep::Profile => f.write_str("write Admin profile"),
        }
    }
}

/// A build step that failed without stopping the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIssue {
    pub step: BuildStep,
    pub message: String,
}

impl fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

/// Outcome of a custom-object build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub package: StagedPackage,
    pub issues: Vec<BuildIssue>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Renders templates into per-deployment staging directories.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    templates: Templates,
    config: PipelineConfig,
    diagnostics: DiagnosticLog,
}

impl PackageBuilder {
    /// Create a builder, loading templates from `config.template_dir` when set.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let templates = match &config.template_dir {
            Some(dir) => Templates::from_dir(dir)?,
            None => Templates::embedded(),
        };
        let diagnostics = DiagnosticLog::new(config.logs_dir());
        Ok(Self {
            templates,
            config,
            diagnostics,
        })
    }

    /// Replace the template set.
    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    fn render(&self, name: &str, subs: &Substitutions) -> Result<String> {
        if self.config.strict_templates {
            self.templates.render_strict(name, subs)
        } else {
            self.templates.render(name, subs)
        }
    }

    fn staging_dir_for(&self, kind: DeploymentKind) -> PathBuf {
        self.config
            .staging_root()
            .join(format!("{}-{}", kind, Uuid::new_v4()))
    }

    fn prepare_staging(&self, root: &Path) -> Result<()> {
        if root.exists() {
            std::fs::remove_dir_all(root)?;
        }
        std::fs::create_dir_all(root)?;
        info!(staging_dir = %root.display(), "staging directory allocated");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Custom object
    // ------------------------------------------------------------------------

    /// Stage a custom object, its fields and an Admin profile granting access.
    ///
    /// Never fails outright. Each failed step is returned in
    /// [`BuildReport::issues`] and appended to `build_errors.log`; a field
    /// that fails to encode is left out of the object and the profile.
    #[instrument(skip(self, spec), fields(api_name = %spec.api_name))]
    pub fn build_custom_object(&self, spec: &ObjectSpec) -> BuildReport {
        for warning in spec.suffix_warnings() {
            warn!(%warning, "api name without custom suffix");
        }

        let root = self.staging_dir_for(DeploymentKind::CustomObject);
        let mut issues = Vec::new();
        let mut files = Vec::new();

        if let Err(e) = self.prepare_staging(&root) {
            self.record(&mut issues, BuildStep::PrepareStaging, &e);
            return BuildReport {
                package: StagedPackage {
                    kind: DeploymentKind::CustomObject,
                    root,
                    files,
                },
                issues,
            };
        }

        let mut field_blocks = Vec::with_capacity(spec.fields.len());
        let mut granted = Vec::with_capacity(spec.fields.len());
        for field in &spec.fields {
            match self.render_field(field) {
                Ok(block) => {
                    field_blocks.push(block);
                    granted.push(field.api_name.as_str());
                }
                Err(e) => {
                    self.record(&mut issues, BuildStep::EncodeField(field.api_name.clone()), &e)
                }
            }
        }

        let steps: [(BuildStep, Result<PathBuf>); 3] = [
            (
                BuildStep::ObjectDescriptor,
                self.write_object_descriptor(&root, spec, &field_blocks),
            ),
            (
                BuildStep::PackageManifest,
                self.write_object_manifest(&root, &spec.api_name),
            ),
            (
                BuildStep::Profile,
                self.write_admin_profile(&root, &spec.api_name, &granted),
            ),
        ];
        for (step, outcome) in steps {
            match outcome {
                Ok(file) => files.push(file),
                Err(e) => self.record(&mut issues, step, &e),
            }
        }

        info!(
            files = files.len(),
            issues = issues.len(),
            "custom object package staged"
        );
        BuildReport {
            package: StagedPackage {
                kind: DeploymentKind::CustomObject,
                root,
                files,
            },
            issues,
        }
    }

    fn record(&self, issues: &mut Vec<BuildIssue>, step: BuildStep, err: &Error) {
        let issue = BuildIssue {
            step,
            message: err.to_string(),
        };
        warn!(step = %issue.step, error = %issue.message, "custom object build step failed");
        self.diagnostics.append(BUILD_ERRORS_LOG, &issue.to_string());
        issues.push(issue);
    }

    fn render_field(&self, field: &FieldSpec) -> Result<String> {
        let subs = Substitutions::new()
            .with("api_name", xml::escape(&field.api_name))
            .with("name", xml::escape(&field.label))
            .with("type", encode_metadata_field(field)?);
        Ok(self.render(names::FIELD, &subs)?.trim_end().to_string())
    }

    fn write_object_descriptor(
        &self,
        root: &Path,
        spec: &ObjectSpec,
        field_blocks: &[String],
    ) -> Result<PathBuf> {
        if !soql::is_safe_api_name(&spec.api_name) {
            return Err(Error::new(ErrorKind::InvalidSpec(format!(
                "'{}' is not a valid object API name",
                spec.api_name
            ))));
        }

        let subs = Substitutions::new()
            .with(
                "description",
                xml::escape(spec.description.as_deref().unwrap_or_default()),
            )
            .with("name", xml::escape(&spec.name))
            .with("plural_name", xml::escape(&spec.plural_name))
            .with("fields", field_blocks.join("\n"));
        let descriptor = self.render(names::OBJECT, &subs)?;

        let path_subs = Substitutions::new().with("api_name", spec.api_name.as_str());
        write_file(root, OBJECT_DESCRIPTOR_PATH, &path_subs, &descriptor)
    }

    fn write_object_manifest(&self, root: &Path, api_name: &str) -> Result<PathBuf> {
        let manifest = PackageManifest::new(self.config.package_api_version.as_str())
            .add_type(metadata_types::CUSTOM_OBJECT, [api_name])
            .add_type(metadata_types::PROFILE, [ADMIN_PROFILE])
            .render(&self.templates)?;
        write_file(root, PACKAGE_PATH, &Substitutions::new(), &manifest)
    }

    fn write_admin_profile(
        &self,
        root: &Path,
        object_api_name: &str,
        field_api_names: &[&str],
    ) -> Result<PathBuf> {
        let permissions = field_api_names
            .iter()
            .map(|field| {
                format!(
                    "    <fieldPermissions>\n        <editable>true</editable>\n        \
                     <field>{}.{}</field>\n        <readable>true</readable>\n    </fieldPermissions>",
                    xml::escape(object_api_name),
                    xml::escape(field)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let subs = Substitutions::new().with("fieldPermissions", permissions);
        let profile = self.render(names::PROFILE, &subs)?;
        write_file(root, ADMIN_PROFILE_PATH, &Substitutions::new(), &profile)
    }

    // ------------------------------------------------------------------------
    // Einstein Studio model
    // ------------------------------------------------------------------------

    /// Stage an Einstein Studio model as an `AppFrameworkTemplateBundle`.
    ///
    /// The first failure is logged to `build_errors.log` and returned.
    #[instrument(skip(self, spec), fields(model = %spec.model_name))]
    pub fn build_einstein_model(&self, spec: &ModelSpec) -> Result<StagedPackage> {
        self.stage_einstein_model(spec).inspect_err(|e| {
            error!(error = %e, "einstein model build failed");
            self.diagnostics.append(
                BUILD_ERRORS_LOG,
                &format!("einstein model '{}': {}", spec.model_name, e),
            );
        })
    }

    fn stage_einstein_model(&self, spec: &ModelSpec) -> Result<StagedPackage> {
        if spec.missing_required() {
            return Err(Error::new(ErrorKind::InvalidSpec(
                "model_name, description, outcome_field, data_source and fields are required"
                    .to_string(),
            )));
        }
        let template_name = spec.template_name();

        let container = self.render(
            names::EINSTEIN_MODEL_CONTAINER,
            &Substitutions::new()
                .with("model_label", json::escape(&spec.model_name))
                .with("model_description", json::escape(&spec.description))
                .with("model_capability", spec.model_capability.as_str())
                .with("outcome_field", json::escape(&spec.outcome_field))
                .with("goal", spec.goal.as_str()),
        )?;

        let setup = self.render(
            names::EINSTEIN_MODEL_SETUP,
            &Substitutions::new()
                .with(
                    "setup_description",
                    json::escape(&format!("{} - Model Setup", spec.description)),
                )
                .with("data_source", json::escape(&spec.data_source))
                .with("outcome_type", spec.model_capability.outcome_type())
                .with("failure_value", json::escape(&spec.failure_value))
                .with("goal", spec.goal.as_str())
                .with("outcome_label", json::escape(&outcome_label(&spec.outcome_field)))
                .with("outcome_field", json::escape(&spec.outcome_field))
                .with("success_value", json::escape(&spec.success_value))
                .with("algorithm_type", spec.algorithm_type.as_str())
                .with("fields_json", encode_model_fields(spec)?),
        )?;

        let template_info = self.render(
            names::EINSTEIN_TEMPLATE_INFO,
            &Substitutions::new()
                .with("model_label", json::escape(&spec.model_name))
                .with(
                    "template_description",
                    json::escape(&format!(
                        "{} - Einstein Studio Model Template",
                        spec.description
                    )),
                )
                .with("template_name", template_name.as_str()),
        )?;

        let manifest = PackageManifest::new(self.config.package_api_version.as_str())
            .add_type(metadata_types::APP_TEMPLATE_BUNDLE, [template_name.as_str()])
            .render(&self.templates)?;

        let root = self.staging_dir_for(DeploymentKind::EinsteinModel);
        self.prepare_staging(&root)?;

        let path_subs = Substitutions::new().with("template_name", template_name.as_str());
        let files = vec![
            write_file(&root, PACKAGE_PATH, &path_subs, &manifest)?,
            write_file(&root, TEMPLATE_INFO_PATH, &path_subs, &template_info)?,
            write_file(&root, MODEL_CONTAINER_PATH, &path_subs, &container)?,
            write_file(&root, MODEL_SETUP_PATH, &path_subs, &setup)?,
        ];

        info!(template_name = %template_name, "einstein model package staged");
        Ok(StagedPackage {
            kind: DeploymentKind::EinsteinModel,
            root,
            files,
        })
    }
}

/// Write `contents` to `root/<path_template>` after resolving the path's placeholders.
fn write_file(
    root: &Path,
    path_template: &str,
    path_subs: &Substitutions,
    contents: &str,
) -> Result<PathBuf> {
    let rendered = substitute(path_template, path_subs);
    if !rendered.unresolved.is_empty() {
        return Err(Error::new(ErrorKind::UnresolvedPlaceholder {
            template: path_template.to_string(),
            placeholders: rendered.unresolved,
        }));
    }

    let relative = PathBuf::from(rendered.text);
    let path = root.join(&relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, contents)?;
    debug!(file = %relative.display(), "staged file");
    Ok(relative)
}
