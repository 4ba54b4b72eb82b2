use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Mode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::interpreter::Factory;
use crate::status::ChildStatus;
use anyhow::Result;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Command that is not a builtin.
///
/// Executing it spawns the resolved program as a child process. In
/// [`Mode::Foreground`] the shell waits on that exact pid; in
/// [`Mode::Background`] the child is handed over to the job registry and left
/// for the reaper.
pub struct ExternalCommand {
    name: String,
    args: Vec<String>,
    mode: Mode,
}

impl ExternalCommand {
    pub fn new(name: String, args: Vec<String>, mode: Mode) -> Self {
        Self { name, args, mode }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    /// Accepts every name; resolution failures surface when the command runs.
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
        mode: Mode,
    ) -> Option<Box<dyn ExecutableCommand>> {
        Some(Box::new(ExternalCommand::new(
            name.to_owned(),
            args.iter().map(|x| x.to_string()).collect(),
            mode,
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, out: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        if !env.current_dir.is_dir() {
            return Err(ShellError::PathFailure {
                path: env.current_dir.clone(),
                reason: "working directory is not accessible".to_string(),
            }
            .into());
        }

        let search_paths = env.get_var("PATH").unwrap_or_default();
        let program = find_command_path(OsStr::new(&search_paths), Path::new(&self.name))
            .ok_or_else(|| ShellError::CommandNotFound(self.name.clone()))?
            .into_owned();

        let mut child = std::process::Command::new(&program)
            .args(&self.args)
            .envs(&env.vars)
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(|source| classify_spawn_error(&self.name, source))?;

        let pid = child.id() as i32;
        log::debug!("spawned [{}] {} ({:?})", pid, program.display(), self.mode);
        writeln!(out, "[{}] {}", pid, self.name)?;
        out.flush()?;

        match self.mode {
            Mode::Foreground => {
                let status = ChildStatus::from(child.wait()?);
                writeln!(out, "[{}] {} {}", pid, self.name, status)?;
                Ok(status.exit_code())
            }
            Mode::Background => {
                // Dropping `child` neither waits nor kills; the reaper collects it.
                env.jobs.insert(pid, self.name);
                Ok(0)
            }
        }
    }
}

/// Split spawn errors into "the program can't be run" and "no process could be made".
fn classify_spawn_error(name: &str, source: io::Error) -> ShellError {
    let is_exec_error = matches!(
        source.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound
    ) || source.raw_os_error() == Some(nix::errno::Errno::ENOEXEC as i32);

    if is_exec_error {
        ShellError::ExecFailure {
            name: name.to_owned(),
            source,
        }
    } else {
        ShellError::SpawnFailure {
            name: name.to_owned(),
            source,
        }
    }
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it is an existing file.
/// - Relative with multiple components (e.g., `bin/sh`): returns it if it exists.
/// - `./foo` on Unix or any `./`-prefixed path on other platforms: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable match.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.is_file() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

/// First PATH entry holding an executable file named `cmd`; entries that are
/// not executable are skipped the way `execvp` skips them.
fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}
