//! Invocation request and result types

use std::borrow::Cow;
use std::path::PathBuf;

use crate::interpreter::Interpreter;
use crate::script::ScriptSource;

/// One execution attempt of a user script.
///
/// Created per invocation and dropped once the subprocess completes; nothing
/// is persisted.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    /// The script to run
    pub script: ScriptSource,
    /// Interpreter launched against the script
    pub interpreter: Interpreter,
    /// Arguments forwarded to the script, in order
    pub args: Vec<String>,
    /// Extra environment variables for the child (inherits the rest)
    pub env: Vec<(String, String)>,
    /// Working directory for the child
    pub cwd: Option<PathBuf>,
}

impl InvocationRequest {
    /// Request with default interpreter and no extra arguments
    pub fn new(script: ScriptSource) -> Self {
        Self {
            script,
            interpreter: Interpreter::default(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }
}

/// Outcome of a completed invocation. Immutable once produced.
#[derive(Debug, Clone)]
pub struct InvocationResult {
    /// Exit code; `128 + signal` when the child was signal-terminated
    pub exit_code: i32,
    /// Captured standard output, byte-for-byte
    pub stdout: Vec<u8>,
    /// Captured standard error, byte-for-byte
    pub stderr: Vec<u8>,
    /// Signal that terminated the child, if any
    pub signal: Option<i32>,
    /// Wall clock time in milliseconds
    pub wall_time_ms: u64,
}

impl InvocationResult {
    /// Success is exit code zero
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Captured stdout as text, with invalid UTF-8 replaced
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Captured stderr as text, with invalid UTF-8 replaced
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}
