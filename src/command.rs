use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Whether the shell waits for an external program before prompting again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Block until the child terminates and report its status.
    Foreground,
    /// Register the child as a job and return immediately.
    Background,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command, writing notifications and results to `out`.
    fn execute(self: Box<Self>, out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    ///
    /// `mode` only matters to factories producing external programs; built-ins
    /// always run synchronously.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
        mode: Mode,
    ) -> Option<Box<dyn ExecutableCommand>>;
}
