//! Error types for script invocation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for invoker operations
pub type Result<T> = std::result::Result<T, InvokerError>;

/// Errors that can occur while invoking a script.
///
/// Everything except [`InvokerError::Io`] is a pre-spawn failure: it is
/// reported before any child process is created. A script that runs and
/// exits non-zero is not an error; the status is relayed in the result.
#[derive(Error, Debug)]
pub enum InvokerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Script not readable: {}", .0.display())]
    ScriptNotReadable(PathBuf, #[source] io::Error),

    #[error("Interpreter not found: {0}")]
    InterpreterNotFound(String),

    #[error("Launch failure: {0}")]
    Launch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InvokerError::ScriptNotFound(PathBuf::from("/tmp/missing.py"));
        assert_eq!(err.to_string(), "Script not found: /tmp/missing.py");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let invoker_err = InvokerError::from(io_err);
        assert!(invoker_err.to_string().contains("IO error"));
    }

    #[test]
    fn test_interpreter_not_found_names_program() {
        let err = InvokerError::InterpreterNotFound("python9".to_string());
        assert!(err.to_string().contains("python9"));
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_result_error() {
        fn returns_error() -> Result<i32> {
            Err(InvokerError::Launch("spawn failed".to_string()))
        }
        assert!(returns_error().is_err());
    }
}
