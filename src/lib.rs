//! script-runner-rs: run user scripts against a fixed interpreter stack
//!
//! A thin invocation wrapper around an interpreter subprocess. The runner
//! image ships a fixed set of data-processing libraries; this crate spawns
//! the interpreter on a mounted script file, waits for it to finish, and
//! surfaces the captured output and exit status to the caller.
//!
//! # Modules
//!
//! - **script**: Script sources (path or inline code) and pre-spawn checks
//! - **interpreter**: Interpreter discovery and PATH resolution
//! - **execution**: Subprocess spawn, wait, and output capture
//! - **environment**: The pre-installed library manifest
//! - **invoker**: Main invocation orchestration
//!
//! # Example
//!
//! ```ignore
//! use script_runner::{Invoker, ScriptSource};
//!
//! let invoker = Invoker::builder()
//!     .env("DATA_DIR", "/mnt/data")
//!     .build();
//!
//! let result = invoker.run(&ScriptSource::path("job.py"), &[])?;
//! println!("Exit code: {}", result.exit_code);
//! ```

// Core modules
pub mod errors;
pub mod interpreter;
pub mod script;

// Layered modules
pub mod environment;
pub mod execution;
pub mod invocation;

// Main invoker
pub mod invoker;

// Public API
pub use environment::{Library, PRE_INSTALLED};
pub use errors::{InvokerError, Result};
pub use interpreter::Interpreter;
pub use invocation::{InvocationRequest, InvocationResult};
pub use invoker::{Invoker, InvokerBuilder};
pub use script::ScriptSource;
