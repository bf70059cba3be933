//! Main invocation orchestration

use std::path::PathBuf;

use log::{debug, info};

use crate::errors::Result;
use crate::execution;
use crate::interpreter::Interpreter;
use crate::invocation::{InvocationRequest, InvocationResult};
use crate::script::ScriptSource;

/// Builder pattern for invoker creation
pub struct InvokerBuilder {
    interpreter: Interpreter,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl InvokerBuilder {
    /// Create new builder with the system Python interpreter
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::default(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Set the interpreter
    pub fn interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set the interpreter from a program name or path
    pub fn interpreter_program(self, program: impl Into<String>) -> Self {
        self.interpreter(Interpreter::new(program))
    }

    /// Add an environment variable for the child process
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the child's working directory
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Build invoker
    pub fn build(self) -> Invoker {
        Invoker {
            interpreter: self.interpreter,
            env: self.env,
            cwd: self.cwd,
        }
    }
}

impl Default for InvokerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs user scripts through a configured interpreter.
///
/// Holds no mutable state; each call creates and tears down exactly one
/// child process and blocks until it exits.
pub struct Invoker {
    interpreter: Interpreter,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl Invoker {
    /// Create new builder
    pub fn builder() -> InvokerBuilder {
        InvokerBuilder::new()
    }

    /// The configured interpreter
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run a script with the invoker's configuration, forwarding `args`
    pub fn run(&self, script: &ScriptSource, args: &[String]) -> Result<InvocationResult> {
        let request = InvocationRequest {
            script: script.clone(),
            interpreter: self.interpreter.clone(),
            args: args.to_vec(),
            env: self.env.clone(),
            cwd: self.cwd.clone(),
        };
        Self::invoke(&request)
    }

    /// Execute a fully-specified invocation request.
    ///
    /// Pre-spawn checks run first: the script must be an existing readable
    /// file and the interpreter must resolve. Only then is the single child
    /// process spawned and awaited.
    pub fn invoke(request: &InvocationRequest) -> Result<InvocationResult> {
        let script = request.script.materialize()?;
        let interpreter = request.interpreter.resolve()?;

        info!(
            "Executing {} with {}",
            request.script.describe(),
            interpreter.display()
        );

        let result = execution::execute(
            &interpreter,
            script.path(),
            &request.args,
            &request.env,
            request.cwd.as_deref(),
        )?;

        debug!(
            "Completed in {}ms with exit code {}",
            result.wall_time_ms, result.exit_code
        );

        Ok(result)
    }
}

impl Default for Invoker {
    fn default() -> Self {
        Self::builder().build()
    }
}
