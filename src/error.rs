use std::path::PathBuf;
use thiserror::Error;

/// Failures the shell reports to the user without leaving the prompt loop.
///
/// Every variant is non-fatal: the dispatcher renders it as a one-line
/// diagnostic on the output stream and carries on with the next instruction.
#[derive(Error, Debug)]
pub enum ShellError {
    /// The program name could not be resolved to an existing file.
    #[error("Command Failed: {0}: command not found")]
    CommandNotFound(String),

    /// The program exists but the OS refused to run it.
    #[error("Command Failed: {name}: {source}")]
    ExecFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A new process could not be created at all.
    #[error("Spawn Failed: {name}: {source}")]
    SpawnFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// `cd` could not switch to the requested directory.
    #[error("Path Doesn't Exist: {path}: {reason}")]
    PathFailure { path: PathBuf, reason: String },

    /// The current working directory could not be determined.
    #[error("Couldn't Find Current Directory: {0}")]
    QueryFailure(#[source] std::io::Error),
}

impl ShellError {
    /// Exit code a POSIX shell would report for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::CommandNotFound(_) => 127,
            ShellError::ExecFailure { .. } => 126,
            _ => 1,
        }
    }
}
