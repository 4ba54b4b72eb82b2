use crate::jobs::JobRegistry;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable state shared by the dispatcher, built-ins, launcher and reaper.
///
/// The environment contains:
/// - `vars`: environment variables handed to spawned programs.
/// - `current_dir`: the directory spawned programs start in.
/// - `should_exit`: set by `exit`; the REPL stops once it sees it.
/// - `jobs`: background children awaiting a reap.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
    /// Live background jobs.
    pub jobs: JobRegistry,
}

impl Environment {
    /// Capture the current process state into a new `Environment` with no jobs.
    pub fn new() -> Self {
        let vars = stdenv::vars().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
            jobs: JobRegistry::new(),
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
