//! The pre-installed library set shipped in the runner image
//!
//! The container image bakes in a fixed set of data-processing libraries;
//! the invoker assumes they are present and never installs or verifies them
//! on its own. This module carries the static manifest and an on-demand
//! importability probe for diagnostics.

use std::process::{Command, Stdio};

use crate::errors::{InvokerError, Result};
use crate::interpreter::Interpreter;

/// One entry of the fixed library set
#[derive(Debug, Clone, Copy)]
pub struct Library {
    pub name: &'static str,
    pub description: &'static str,
}

/// Libraries baked into the runner image
pub const PRE_INSTALLED: &[Library] = &[
    Library {
        name: "pandas",
        description: "Data manipulation and analysis",
    },
    Library {
        name: "openpyxl",
        description: "Excel file reading and writing",
    },
    Library {
        name: "lxml",
        description: "XML and HTML processing",
    },
    Library {
        name: "boto3",
        description: "AWS SDK for Python",
    },
];

/// Check whether `library` can be imported by the given interpreter.
///
/// Spawns `interpreter -c "import <library>"` and reports the outcome;
/// resolution failure of the interpreter itself is an error, an import
/// failure is `Ok(false)`.
pub fn library_available(interpreter: &Interpreter, library: &str) -> Result<bool> {
    let program = interpreter.resolve()?;

    let status = Command::new(&program)
        .arg("-c")
        .arg(format!("import {}", library))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            InvokerError::Launch(format!("Failed to spawn {}: {}", program.display(), e))
        })?;

    Ok(status.success())
}
