//! Writes a rendered project to disk.
//!
//! Every file is written to a sibling `.tmp` path and renamed into place, so
//! an interrupted run never leaves a truncated file under its final name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{GeneratedFile, GeneratedFiles, ScaffoldError, ScaffoldResult};

/// Directories created even when no artifact lands in them.
const LAYOUT: &[&str] = &[
    "build",
    "internal/application/dto",
    "internal/domain/model",
    "internal/interactor/rest",
    "internal/repository/implementor/postgres",
    "migrations",
    "pkg",
    "script",
];

/// Writes artifacts below one project root.
pub struct ProjectWriter {
    root: PathBuf,
}

impl ProjectWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the hexagonal directory layout, including `cmd/<module>`.
    pub fn create_layout(&self, module_name: &str) -> ScaffoldResult<()> {
        let cmd = PathBuf::from("cmd").join(module_name);
        for dir in LAYOUT.iter().map(PathBuf::from).chain(std::iter::once(cmd)) {
            let path = self.root.join(dir);
            fs::create_dir_all(&path).map_err(|source| ScaffoldError::Write {
                path: path.clone(),
                source,
            })?;
        }
        tracing::debug!("created layout under {}", self.root.display());
        Ok(())
    }

    /// Write every file; stops at the first failure.
    pub fn write_all(&self, files: &GeneratedFiles) -> ScaffoldResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(files.len());
        for file in &files.files {
            written.push(self.write(file)?);
        }
        tracing::info!("wrote {} files under {}", written.len(), self.root.display());
        Ok(written)
    }

    /// Write one artifact and return its absolute path.
    pub fn write(&self, file: &GeneratedFile) -> ScaffoldResult<PathBuf> {
        let path = self.root.join(&file.path);
        write_atomic(&path, &file.content, file.executable)?;
        tracing::debug!("wrote {}", path.display());
        Ok(path)
    }
}

/// Write `content` to `path` through a temporary sibling and a rename.
pub fn write_atomic(path: &Path, content: &str, executable: bool) -> ScaffoldResult<()> {
    let fail = |source| ScaffoldError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(fail)?;
    }

    let tmp = temp_path(path);
    let result = fs::write(&tmp, content)
        .and_then(|()| set_executable(&tmp, executable))
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp);
        return Err(fail(source));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(unix)]
fn set_executable(path: &Path, executable: bool) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if executable {
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path, _executable: bool) -> std::io::Result<()> {
    Ok(())
}
