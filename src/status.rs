use crate::command::ExitCode;
use std::fmt;
use std::process::ExitStatus;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    /// Normal termination with the given exit code.
    Exited(i32),
    /// Killed by the given signal number.
    Signaled(i32),
}

impl ChildStatus {
    /// Conventional shell exit code: the code itself, or `128 + signal`.
    pub fn exit_code(self) -> ExitCode {
        match self {
            ChildStatus::Exited(code) => code,
            ChildStatus::Signaled(signal) => 128 + signal,
        }
    }
}

impl From<ExitStatus> for ChildStatus {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ChildStatus::Exited(code),
            None => terminated_by_signal(status),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> ChildStatus {
    use std::os::unix::process::ExitStatusExt;
    match ExitStatusExt::signal(&status) {
        Some(signal) => ChildStatus::Signaled(signal),
        None => ChildStatus::Exited(-1),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> ChildStatus {
    ChildStatus::Exited(-1)
}

impl fmt::Display for ChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildStatus::Exited(code) => write!(f, "Exit status {}", code),
            ChildStatus::Signaled(signal) => write!(f, "Exit signal {}", signal),
        }
    }
}
