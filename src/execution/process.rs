//! Subprocess spawn and exit-status decoding

use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::Instant;

use log::debug;

use crate::errors::{InvokerError, Result};
use crate::invocation::InvocationResult;

/// Spawn the interpreter on the script, wait for termination, and capture
/// both standard streams.
///
/// The interpreter path must already be resolved; a spawn error at this
/// point (races with file removal included) is reported as a launch
/// failure.
pub(crate) fn execute(
    interpreter: &Path,
    script: &Path,
    args: &[String],
    env: &[(String, String)],
    cwd: Option<&Path>,
) -> Result<InvocationResult> {
    let mut command = Command::new(interpreter);
    command.arg(script).args(args);

    for (key, value) in env {
        command.env(key, value);
    }
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    debug!(
        "Spawning {} {} {:?}",
        interpreter.display(),
        script.display(),
        args
    );

    let start = Instant::now();
    let output = command.output().map_err(|e| {
        InvokerError::Launch(format!("Failed to spawn {}: {}", interpreter.display(), e))
    })?;
    let wall_time_ms = start.elapsed().as_millis() as u64;

    let (exit_code, signal) = decode_exit_status(output.status);

    Ok(InvocationResult {
        exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
        signal,
        wall_time_ms,
    })
}

/// Decode an exit status: the code when the child exited, `128 + signal`
/// when it was signal-terminated
fn decode_exit_status(status: ExitStatus) -> (i32, Option<i32>) {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => (code, None),
        (None, Some(signal)) => (128 + signal, Some(signal)),
        (None, None) => (-1, None),
    }
}
