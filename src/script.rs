//! Script sources and pre-spawn validation

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::errors::{InvokerError, Result};

/// Where the script to run comes from
#[derive(Debug, Clone)]
pub enum ScriptSource {
    /// A script file on disk, typically a container volume mount
    Path(PathBuf),
    /// Script code supplied inline; written to a temp file before spawn
    Inline(String),
}

impl ScriptSource {
    /// Script from a file path
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ScriptSource::Path(path.into())
    }

    /// Script from inline code
    pub fn inline(code: impl Into<String>) -> Self {
        ScriptSource::Inline(code.into())
    }

    /// Human-readable description for logs and records
    pub fn describe(&self) -> String {
        match self {
            ScriptSource::Path(path) => path.display().to_string(),
            ScriptSource::Inline(code) => format!("<inline, {} bytes>", code.len()),
        }
    }

    /// Pin the source to a concrete, validated file on disk.
    ///
    /// For path sources this performs the pre-spawn checks: the path must
    /// reference an existing, readable regular file. Inline code is written
    /// to a named temp file that lives as long as the returned value.
    pub(crate) fn materialize(&self) -> Result<MaterializedScript> {
        match self {
            ScriptSource::Path(path) => {
                validate_script_path(path)?;
                Ok(MaterializedScript {
                    path: path.clone(),
                    _temp: None,
                })
            }
            ScriptSource::Inline(code) => {
                let temp = write_temp_script(code)?;
                debug!("Inline script written to {}", temp.path().display());
                Ok(MaterializedScript {
                    path: temp.path().to_path_buf(),
                    _temp: Some(temp),
                })
            }
        }
    }
}

/// A script pinned to a path, holding any backing temp file alive
#[derive(Debug)]
pub(crate) struct MaterializedScript {
    path: PathBuf,
    _temp: Option<NamedTempFile>,
}

impl MaterializedScript {
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Pre-spawn validation: existing, readable, regular file
fn validate_script_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(InvokerError::InvalidConfig(
            "Script path cannot be empty".to_string(),
        ));
    }

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InvokerError::ScriptNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(InvokerError::Io(e)),
    };

    if !metadata.is_file() {
        return Err(InvokerError::NotAFile(path.to_path_buf()));
    }

    File::open(path)
        .map(drop)
        .map_err(|e| InvokerError::ScriptNotReadable(path.to_path_buf(), e))
}

fn write_temp_script(code: &str) -> Result<NamedTempFile> {
    let mut temp = tempfile::Builder::new()
        .prefix("script-")
        .suffix(".py")
        .tempfile()?;
    temp.write_all(code.as_bytes())?;
    if !code.ends_with('\n') {
        temp.write_all(b"\n")?;
    }
    temp.flush()?;
    Ok(temp)
}
