use crate::command::{CommandFactory, ExitCode, Mode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::jobs::JobRegistry;
use crate::lexer;
use crate::parser::{self, Instruction};
use crate::reaper::Reaper;
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate: built-ins and the external launcher.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal job-control shell.
///
/// The interpreter owns an [`Environment`] (including the background job
/// registry), a list of [`CommandFactory`] objects queried in order to create
/// commands by name, and the [`Reaper`] that collects finished background
/// children once per dispatch cycle.
///
/// Example
/// ```
/// use jobsh::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.dispatch(vec!["pid".to_string()], &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), format!("Process ID: {}\n", std::process::id()));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
    reaper: Reaper,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
            reaper: Reaper::default(),
        }
    }

    /// Replace the reaper, e.g. to drive it from a scripted child source.
    pub fn with_reaper(mut self, reaper: Reaper) -> Self {
        self.reaper = reaper;
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Background jobs that have been launched but not reaped yet.
    pub fn jobs(&self) -> &JobRegistry {
        &self.env.jobs
    }

    /// True once `exit` has been dispatched.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's exit code or an error if the command cannot be created
    /// or fails to execute.
    pub fn run(
        &mut self,
        name: &str,
        args: &[&str],
        mode: Mode,
        out: &mut dyn Write,
    ) -> Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args, mode) {
                return cmd.execute(out, &mut self.env);
            }
        }
        Err(ShellError::CommandNotFound(name.to_owned()).into())
    }

    /// Route one tokenized instruction to a built-in or the launcher.
    ///
    /// Empty input does nothing. Failures are written to `out` as a one-line
    /// diagnostic and turned into a non-zero exit code; only a failure to
    /// write to `out` itself is returned as an error.
    pub fn dispatch(&mut self, tokens: Vec<String>, out: &mut dyn Write) -> Result<ExitCode> {
        let Some(Instruction { name, args, mode }) = parser::construct_instruction(tokens) else {
            return Ok(0);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match self.run(&name, &args, mode, out) {
            Ok(code) => Ok(code),
            Err(e) => {
                let code = e.downcast_ref::<ShellError>().map_or(1, ShellError::exit_code);
                writeln!(out, "{}", e)?;
                out.flush()?;
                Ok(code)
            }
        }
    }

    /// Collect background jobs that finished since the last cycle.
    pub fn reap(&mut self, out: &mut dyn Write) -> Result<usize> {
        self.reaper.reap(&mut self.env.jobs, out)
    }

    /// One dispatch cycle for a raw input line: tokenize, dispatch, reap.
    ///
    /// After `exit` the reap step is skipped.
    pub fn execute_line(&mut self, line: &str, out: &mut dyn Write) -> Result<ExitCode> {
        let code = self.dispatch(lexer::split_into_tokens(line), out)?;
        if !self.env.should_exit {
            self.reap(out)?;
        }
        Ok(code)
    }

    /// Interactive read-eval loop. Returns when `exit` runs or input ends.
    pub fn repl(&mut self, prompt: &str) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        while !self.env.should_exit {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.execute_line(&line, &mut stdout)?;
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => {
                    log::debug!("end of input");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        log::debug!("leaving with {} unreaped job(s)", self.env.jobs.len());
        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `exit`, `cd`, `pwd`, `pid`, `ppid`, `jobs`
    /// - external command launcher, which accepts every other name
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Pwd>::default()),
            Box::new(Factory::<Pid>::default()),
            Box::new(Factory::<Ppid>::default()),
            Box::new(Factory::<Jobs>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
