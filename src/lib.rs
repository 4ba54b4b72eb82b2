//! A small interactive shell with background jobs.
//!
//! Each input line is split into tokens and either handled by a built-in
//! (`exit`, `cd`, `pwd`, `pid`, `ppid`, `jobs`) or launched as an external
//! program. A trailing `&` launches the program in the background: the shell
//! registers it as a job and keeps prompting, and after every instruction the
//! reaper collects background children that have finished and reports how
//! they ended.
//!
//! The main entry point is [`Interpreter`]. The public modules expose the
//! command traits, the environment and job registry, and the reaper's
//! [`ChildWaiter`](reaper::ChildWaiter) seam.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod jobs;
pub mod lexer;
pub mod parser;
pub mod reaper;
pub mod status;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Serialises tests that read or change the process working directory.
    pub fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
