//! Execution layer: subprocess spawn, wait, and output capture
//!
//! The lifecycle is spawn → wait → report, strictly sequential. Exactly one
//! child process is created per call; there are no retries and no timeout
//! enforcement.

pub mod process;

pub(crate) use process::execute;
