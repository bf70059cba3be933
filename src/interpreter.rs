//! Interpreter discovery and resolution

use std::env;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::errors::{InvokerError, Result};

/// Interpreter candidates tried for the system default, in order
const DEFAULT_PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// The executable used to run target scripts.
///
/// The program may be a bare name (resolved against `PATH` at invocation
/// time) or an explicit path. The runner image guarantees a Python
/// interpreter is present; [`Interpreter::system_python`] picks it up.
#[derive(Debug, Clone)]
pub struct Interpreter {
    program: String,
}

impl Interpreter {
    /// Interpreter from a bare name or explicit path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The system Python executable: `python3`, falling back to `python`.
    ///
    /// Never fails at construction; if neither candidate is on `PATH` the
    /// failure surfaces at invocation time as a launch failure.
    pub fn system_python() -> Self {
        for candidate in DEFAULT_PYTHON_CANDIDATES {
            if find_in_path(candidate).is_some() {
                return Self::new(*candidate);
            }
        }
        Self::new(DEFAULT_PYTHON_CANDIDATES[0])
    }

    /// The configured program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve to a concrete executable path, or fail pre-spawn.
    ///
    /// A program containing a path separator is checked directly; a bare
    /// name is searched on `PATH`. Either way the result must carry the
    /// execute bit.
    pub fn resolve(&self) -> Result<PathBuf> {
        if self.program.is_empty() {
            return Err(InvokerError::InvalidConfig(
                "Interpreter cannot be empty".to_string(),
            ));
        }

        if self.program.contains('/') {
            let path = PathBuf::from(&self.program);
            if is_executable(&path) {
                return Ok(path);
            }
            return Err(InvokerError::InterpreterNotFound(self.program.clone()));
        }

        find_in_path(&self.program)
            .ok_or_else(|| InvokerError::InterpreterNotFound(self.program.clone()))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::system_python()
    }
}

/// Search `PATH` for an executable with the given name
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
