//! Zip a staging directory and base64-encode the archive.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tracing::{debug, info, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, ErrorKind, Result};

/// Archive location for a staging directory: a `.zip` sibling.
pub fn zip_path_for(staging_dir: &Path) -> PathBuf {
    let mut name = staging_dir.as_os_str().to_os_string();
    name.push(".zip");
    PathBuf::from(name)
}

/// Zip `staging_dir` into its sibling archive and return the archive as base64.
///
/// Entry names are relative to `staging_dir` and use `/` separators.
#[instrument(skip(staging_dir), fields(staging_dir = %staging_dir.display()))]
pub fn package(staging_dir: &Path) -> Result<String> {
    let zip_path = zip_path_for(staging_dir);
    zip_directory(staging_dir, &zip_path)?;

    let bytes = std::fs::read(&zip_path).map_err(|e| {
        Error::with_source(
            ErrorKind::Base64EncodeFailure(format!("{}: {}", zip_path.display(), e)),
            e,
        )
    })?;
    info!(zip = %zip_path.display(), bytes = bytes.len(), "package archive written");
    Ok(general_purpose::STANDARD.encode(bytes))
}

/// Write every file under `staging_dir` into a fresh deflate archive at `zip_path`.
pub fn zip_directory(staging_dir: &Path, zip_path: &Path) -> Result<()> {
    if !staging_dir.is_dir() {
        return Err(Error::new(ErrorKind::FileNotFound(staging_dir.to_path_buf())));
    }
    if zip_path.exists() {
        std::fs::remove_file(zip_path)?;
    }

    let mut files = Vec::new();
    collect_files(staging_dir, &mut files)?;
    files.sort();

    let mut writer = ZipWriter::new(File::create(zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for file in &files {
        let name = entry_name(staging_dir, file)?;
        debug!(entry = %name, "adding archive entry");
        writer.start_file(name, options)?;
        writer.write_all(&std::fs::read(file)?)?;
    }
    writer.finish()?;
    Ok(())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn entry_name(root: &Path, file: &Path) -> Result<String> {
    let relative = file.strip_prefix(root).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "{} is outside {}: {}",
            file.display(),
            root.display(),
            e
        )))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            Error::new(ErrorKind::Io(format!(
                "non UTF-8 path in staging directory: {}",
                relative.display()
            )))
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
