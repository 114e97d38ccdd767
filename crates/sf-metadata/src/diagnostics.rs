//! Best-effort diagnostic log files.
//!
//! Failures to write are reported with `warn!` and otherwise ignored, so a
//! read-only or full disk never changes the outcome of a build or deploy.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

pub const ACTIVITY_LOG: &str = "activity.log";
pub const BUILD_ERRORS_LOG: &str = "build_errors.log";
pub const DEPLOY_REQUEST_LOG: &str = "deploy_request.log";
pub const DEPLOY_RESPONSE_LOG: &str = "deploy_response.log";

/// A directory of diagnostic log files.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    dir: PathBuf,
}

impl DiagnosticLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Append a timestamped entry.
    pub fn append(&self, file: &str, entry: &str) {
        let line = format!("[{}] {}\n", chrono::Utc::now().to_rfc3339(), entry);
        let result = std::fs::create_dir_all(&self.dir).and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.path(file))?
                .write_all(line.as_bytes())
        });
        if let Err(e) = result {
            warn!(file, error = %e, "failed to append diagnostic log");
        }
    }

    /// Replace a file's contents.
    pub fn write(&self, file: &str, contents: &str) {
        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.path(file), contents));
        if let Err(e) = result {
            warn!(file, error = %e, "failed to write diagnostic log");
        }
    }
}
