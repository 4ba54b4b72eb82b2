use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Mode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// on the shell's own thread without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "pwd" or "cd".
    fn name() -> &'static str;

    /// Executes the command, writing its result to `out`.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        <T as BuiltinCommand>::execute(*self, out, env)
    }
}

/// Usage text or argument error produced by `argh` instead of a command.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, out: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(out, "{}", self.output.trim_end())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
        _mode: Mode,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(&[name], args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

#[derive(FromArgs)]
/// Print the current working directory.
pub struct Pwd {
    #[argh(positional, greedy)]
    #[allow(unused)]
    /// extra arguments; ignored
    pub args: Vec<String>,
}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(self, out: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        let cwd = env::current_dir().map_err(ShellError::QueryFailure)?;
        writeln!(out, "Current Directory: {}", cwd.display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional, greedy)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    /// Anything after the first argument is ignored.
    pub args: Vec<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match self.args.into_iter().next() {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => match env.get_var("HOME") {
                Some(home) => PathBuf::from(home),
                None => {
                    return Err(ShellError::PathFailure {
                        path: PathBuf::from("$HOME"),
                        reason: "HOME not set".to_string(),
                    }
                    .into());
                }
            },
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir).map_err(|e| ShellError::PathFailure {
            path: new_dir.clone(),
            reason: e.to_string(),
        })?;

        env::set_current_dir(&canonical).map_err(|e| ShellError::PathFailure {
            path: canonical.clone(),
            reason: e.to_string(),
        })?;
        writeln!(out, "Directory changed to: {}", canonical.display())?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Exit the shell. Background jobs keep running.
pub struct Exit {
    #[argh(positional, greedy)]
    #[allow(unused)]
    /// arguments; ignored, the shell always exits with status 0
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the process id of the shell.
pub struct Pid {
    #[argh(positional, greedy)]
    #[allow(unused)]
    /// extra arguments; ignored
    pub args: Vec<String>,
}

impl BuiltinCommand for Pid {
    fn name() -> &'static str {
        "pid"
    }

    fn execute(self, out: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(out, "Process ID: {}", std::process::id())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the process id of the shell's parent.
pub struct Ppid {
    #[argh(positional, greedy)]
    #[allow(unused)]
    /// extra arguments; ignored
    pub args: Vec<String>,
}

impl BuiltinCommand for Ppid {
    fn name() -> &'static str {
        "ppid"
    }

    fn execute(self, out: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(out, "Parent Process ID: {}", std::os::unix::process::parent_id())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// List background jobs that have not been reaped yet.
pub struct Jobs {
    #[argh(positional, greedy)]
    #[allow(unused)]
    /// extra arguments; ignored
    pub args: Vec<String>,
}

impl BuiltinCommand for Jobs {
    fn name() -> &'static str {
        "jobs"
    }

    fn execute(self, out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(out, "--START OF JOBS LIST--")?;
        for job in env.jobs.list_all() {
            writeln!(out, "[{}] {}", job.pid, job.command_name)?;
        }
        writeln!(out, "--END OF JOBS LIST--")?;
        Ok(0)
    }
}
