//! Pipeline configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::types::{DEPLOY_API_VERSION, PACKAGE_API_VERSION};

const ENV_WORK_DIR: &str = "SFMCP_WORK_DIR";
const ENV_TEMPLATE_DIR: &str = "SFMCP_TEMPLATE_DIR";
const ENV_DEPLOY_TIMEOUT_SECS: &str = "SFMCP_DEPLOY_TIMEOUT_SECS";
const ENV_STRICT_TEMPLATES: &str = "SFMCP_STRICT_TEMPLATES";

/// Configuration for building, packaging and deploying metadata.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root for staging directories, archives and diagnostic logs.
    pub work_dir: PathBuf,
    /// Optional directory of `.tmpl` files overriding the built-in templates.
    pub template_dir: Option<PathBuf>,
    /// Version written into `package.xml`.
    pub package_api_version: String,
    /// Version in the SOAP deploy endpoint path.
    pub deploy_api_version: String,
    /// Total timeout for the deploy call.
    pub deploy_timeout: Duration,
    /// Connection timeout for the deploy call.
    pub connect_timeout: Duration,
    /// Fail builds that leave `##placeholder##` markers behind.
    pub strict_templates: bool,
    /// Keep staging directories and archives after a deploy.
    pub keep_staging: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("sfmcp"),
            template_dir: None,
            package_api_version: PACKAGE_API_VERSION.to_string(),
            deploy_api_version: DEPLOY_API_VERSION.to_string(),
            deploy_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            strict_templates: true,
            keep_staging: false,
        }
    }
}

impl PipelineConfig {
    /// Create a new pipeline config builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Defaults overridden by `SFMCP_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = env_var(ENV_WORK_DIR) {
            config.work_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_var(ENV_TEMPLATE_DIR) {
            config.template_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = env_var(ENV_DEPLOY_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::new(ErrorKind::Config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_DEPLOY_TIMEOUT_SECS, secs
                )))
            })?;
            config.deploy_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = env_var(ENV_STRICT_TEMPLATES) {
            config.strict_templates = parse_flag(&flag).ok_or_else(|| {
                Error::new(ErrorKind::Config(format!(
                    "{} must be true or false, got '{}'",
                    ENV_STRICT_TEMPLATES, flag
                )))
            })?;
        }

        Ok(config)
    }

    /// Parent of all per-deployment staging directories.
    pub fn staging_root(&self) -> PathBuf {
        self.work_dir.join("staging")
    }

    /// Directory holding the diagnostic log files.
    pub fn logs_dir(&self) -> PathBuf {
        self.work_dir.join("logs")
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for PipelineConfig.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.work_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_template_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.template_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_package_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.package_api_version = version.into();
        self
    }

    pub fn with_deploy_api_version(mut self, version: impl Into<String>) -> Self {
        self.config.deploy_api_version = version.into();
        self
    }

    pub fn with_deploy_timeout(mut self, timeout: Duration) -> Self {
        self.config.deploy_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn with_strict_templates(mut self, strict: bool) -> Self {
        self.config.strict_templates = strict;
        self
    }

    pub fn with_keep_staging(mut self, keep: bool) -> Self {
        self.config.keep_staging = keep;
        self
    }

    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.package_api_version, "63.0");
        assert_eq!(config.deploy_api_version, "58.0");
        assert_eq!(config.deploy_timeout, Duration::from_secs(120));
        assert!(config.strict_templates);
        assert!(!config.keep_staging);
        assert!(config.work_dir.ends_with("sfmcp"));
    }

    #[test]
    fn test_builder_and_derived_paths() {
        let config = PipelineConfig::builder()
            .with_work_dir("/var/tmp/sfmcp-test")
            .with_deploy_timeout(Duration::from_secs(5))
            .with_keep_staging(true)
            .build();
        assert_eq!(config.staging_root(), PathBuf::from("/var/tmp/sfmcp-test/staging"));
        assert_eq!(config.logs_dir(), PathBuf::from("/var/tmp/sfmcp-test/logs"));
        assert_eq!(config.deploy_timeout, Duration::from_secs(5));
        assert!(config.keep_staging);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
