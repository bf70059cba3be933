//! Integration tests for script-runner-rs
//!
//! These tests exercise the invoker end to end with real subprocesses.
//! Shell-based tests run anywhere; tests that need a Python interpreter
//! return early when none is on PATH.

use std::path::PathBuf;
use std::sync::Mutex;

use script_runner::{Interpreter, InvocationRequest, Invoker, InvokerError, ScriptSource};

static INTEGRATION_TEST_LOCK: Mutex<()> = Mutex::new(());

fn write_script(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn sh_invoker() -> Invoker {
    Invoker::builder().interpreter_program("sh").build()
}

/// Returns the system Python when present, None otherwise
fn python() -> Option<Interpreter> {
    let interpreter = Interpreter::system_python();
    interpreter.resolve().ok().map(|_| interpreter)
}

/// An existing script's exit code is relayed unchanged
#[test]
fn test_exit_code_is_relayed() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let ok = write_script(&dir, "ok.sh", "exit 0\n");
    let bad = write_script(&dir, "bad.sh", "exit 3\n");

    let invoker = sh_invoker();
    assert_eq!(invoker.run(&ScriptSource::path(ok), &[]).unwrap().exit_code, 0);
    assert_eq!(
        invoker.run(&ScriptSource::path(bad), &[]).unwrap().exit_code,
        3
    );
}

/// Captured stdout round-trips byte-for-byte
#[test]
fn test_stdout_round_trip() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "emit.sh", "printf 'line one\\nline two\\n'\n");
    let result = sh_invoker().run(&ScriptSource::path(script), &[]).unwrap();

    assert_eq!(result.stdout, b"line one\nline two\n");
}

/// Stdout and stderr are captured on separate streams
#[test]
fn test_streams_are_separate() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "both.sh", "echo out\necho err >&2\n");
    let result = sh_invoker().run(&ScriptSource::path(script), &[]).unwrap();

    assert_eq!(result.stdout, b"out\n");
    assert_eq!(result.stderr, b"err\n");
}

/// A non-existent path fails with "not found" and spawns nothing
#[test]
fn test_missing_script_fails_before_spawn() {
    let _lock = INTEGRATION_TEST_LOCK.lock();

    let err = sh_invoker()
        .run(&ScriptSource::path("missing.py"), &[])
        .unwrap_err();

    assert!(matches!(err, InvokerError::ScriptNotFound(_)));
    assert!(err.to_string().contains("not found"));
}

/// A directory is rejected before spawn
#[test]
fn test_directory_is_not_a_script() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let err = sh_invoker()
        .run(&ScriptSource::path(dir.path()), &[])
        .unwrap_err();

    assert!(matches!(err, InvokerError::NotAFile(_)));
}

/// An unresolvable interpreter is a pre-spawn launch failure
#[test]
fn test_unknown_interpreter_is_reported() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "ok.sh", "exit 0\n");
    let invoker = Invoker::builder()
        .interpreter_program("interpreter-that-does-not-exist")
        .build();

    let err = invoker.run(&ScriptSource::path(script), &[]).unwrap_err();
    assert!(matches!(err, InvokerError::InterpreterNotFound(_)));
    assert!(err.to_string().contains("interpreter-that-does-not-exist"));
}

/// Arguments are forwarded to the script in order
#[test]
fn test_arguments_are_forwarded() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "args.sh", "echo \"$1 $2 $3\"\n");
    let args: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    let result = sh_invoker()
        .run(&ScriptSource::path(script), &args)
        .unwrap();

    assert_eq!(result.stdout, b"a b c\n");
}

/// Extra environment variables are visible to the script
#[test]
fn test_env_is_visible() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "env.sh", "echo \"$PIPELINE_STAGE\"\n");
    let invoker = Invoker::builder()
        .interpreter_program("sh")
        .env("PIPELINE_STAGE", "extract")
        .build();

    let result = invoker.run(&ScriptSource::path(script), &[]).unwrap();
    assert_eq!(result.stdout, b"extract\n");
}

/// Inline code behaves exactly like an equivalent path script
#[test]
fn test_inline_code_matches_path_script() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "emit.sh", "printf 'same\\n'\n");
    let invoker = sh_invoker();

    let from_path = invoker.run(&ScriptSource::path(script), &[]).unwrap();
    let from_inline = invoker
        .run(&ScriptSource::inline("printf 'same\\n'"), &[])
        .unwrap();

    assert_eq!(from_path.exit_code, from_inline.exit_code);
    assert_eq!(from_path.stdout, from_inline.stdout);
}

/// An explicit invocation request runs as specified
#[test]
fn test_explicit_request() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "req.sh", "exit 5\n");
    let mut request = InvocationRequest::new(ScriptSource::path(script));
    request.interpreter = Interpreter::new("sh");

    let result = Invoker::invoke(&request).unwrap();
    assert_eq!(result.exit_code, 5);
    assert!(!result.success());
}

// Tests below need a Python interpreter on PATH and return early without one

/// `print("hi"); exit(0)` → exit code 0, stdout "hi\n"
#[test]
fn test_python_ok_script() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let Some(interpreter) = python() else { return };
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "ok.py", "print(\"hi\")\nexit(0)\n");
    let invoker = Invoker::builder().interpreter(interpreter).build();

    let result = invoker.run(&ScriptSource::path(script), &[]).unwrap();
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, b"hi\n");
    assert!(result.success());
}

/// `exit(3)` → exit code 3
#[test]
fn test_python_bad_script() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let Some(interpreter) = python() else { return };
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(&dir, "bad.py", "exit(3)\n");
    let invoker = Invoker::builder().interpreter(interpreter).build();

    let result = invoker.run(&ScriptSource::path(script), &[]).unwrap();
    assert_eq!(result.exit_code, 3);
    assert!(!result.success());
}

/// Python arguments arrive through sys.argv in order
#[test]
fn test_python_argv_forwarding() {
    let _lock = INTEGRATION_TEST_LOCK.lock();
    let Some(interpreter) = python() else { return };
    let dir = tempfile::tempdir().unwrap();

    let script = write_script(
        &dir,
        "argv.py",
        "import sys\nprint(\",\".join(sys.argv[1:]))\n",
    );
    let invoker = Invoker::builder().interpreter(interpreter).build();

    let args: Vec<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
    let result = invoker.run(&ScriptSource::path(script), &args).unwrap();
    assert_eq!(result.stdout, b"x,y\n");
}
