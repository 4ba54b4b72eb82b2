//! Non-blocking collection of terminated children.
//!
//! The reaper is the only place in the shell that asks the OS about "any"
//! child. Foreground waits target their own pid, so every termination event
//! has exactly one consumer.

use crate::jobs::JobRegistry;
use crate::status::ChildStatus;
use anyhow::Result;
use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use std::io::Write;

/// Outcome of a single non-blocking poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A child terminated; its status has now been consumed.
    Terminated { pid: i32, status: ChildStatus },
    /// Children exist but none has finished yet.
    Running,
    /// The process has no children at all.
    NoChildren,
}

/// Source of child-termination events.
pub trait ChildWaiter {
    /// Ask whether any child has terminated, without blocking.
    fn poll_any(&mut self) -> Result<Poll>;
}

/// [`ChildWaiter`] backed by `waitpid(-1, WNOHANG)`.
#[derive(Debug, Default)]
pub struct SystemWaiter;

impl ChildWaiter for SystemWaiter {
    fn poll_any(&mut self) -> Result<Poll> {
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    return Ok(Poll::Terminated {
                        pid: pid.as_raw(),
                        status: ChildStatus::Exited(code),
                    });
                }
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    return Ok(Poll::Terminated {
                        pid: pid.as_raw(),
                        status: ChildStatus::Signaled(signal as i32),
                    });
                }
                Ok(WaitStatus::StillAlive) => return Ok(Poll::Running),
                Ok(other) => log::debug!("ignoring non-terminal wait status {:?}", other),
                Err(Errno::ECHILD) => return Ok(Poll::NoChildren),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Reconciles terminated children with the job registry.
pub struct Reaper {
    waiter: Box<dyn ChildWaiter>,
}

impl Reaper {
    pub fn new(waiter: Box<dyn ChildWaiter>) -> Self {
        Self { waiter }
    }

    /// Drain every child that has terminated so far.
    ///
    /// Registered jobs get a completion report and leave the registry;
    /// terminations with no matching job are consumed silently. Stops as soon
    /// as nothing more is ready. Returns the number of reports written.
    pub fn reap(&mut self, jobs: &mut JobRegistry, out: &mut dyn Write) -> Result<usize> {
        let mut reported = 0;
        loop {
            let poll = match self.waiter.poll_any() {
                Ok(poll) => poll,
                Err(e) => {
                    log::warn!("polling for finished children failed: {:#}", e);
                    break;
                }
            };
            match poll {
                Poll::Terminated { pid, status } => match jobs.remove(pid) {
                    Some(job) => {
                        writeln!(out, "[{}] {} {}", job.pid, job.command_name, status)?;
                        reported += 1;
                    }
                    None => log::debug!("reaped unregistered child {} ({})", pid, status),
                },
                Poll::Running | Poll::NoChildren => break,
            }
        }
        out.flush()?;
        Ok(reported)
    }
}

impl Default for Reaper {
    fn default() -> Self {
        Self::new(Box::new(SystemWaiter))
    }
}

/// Replays a fixed sequence of poll results; reports no children once exhausted.
#[cfg(test)]
pub(crate) struct ScriptedWaiter {
    script: std::collections::VecDeque<Result<Poll>>,
    pub polls: std::rc::Rc<std::cell::Cell<usize>>,
}

#[cfg(test)]
impl ScriptedWaiter {
    pub fn new(script: Vec<Result<Poll>>) -> Self {
        Self {
            script: script.into(),
            polls: Default::default(),
        }
    }
}

#[cfg(test)]
impl ChildWaiter for ScriptedWaiter {
    fn poll_any(&mut self) -> Result<Poll> {
        self.polls.set(self.polls.get() + 1);
        self.script.pop_front().unwrap_or(Ok(Poll::NoChildren))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exited(pid: i32, code: i32) -> Result<Poll> {
        Ok(Poll::Terminated {
            pid,
            status: ChildStatus::Exited(code),
        })
    }

    fn run(script: Vec<Result<Poll>>, jobs: &mut JobRegistry) -> (usize, String, usize) {
        let waiter = ScriptedWaiter::new(script);
        let polls = waiter.polls.clone();
        let mut reaper = Reaper::new(Box::new(waiter));
        let mut out = Vec::new();
        let n = reaper.reap(jobs, &mut out).unwrap();
        (n, String::from_utf8(out).unwrap(), polls.get())
    }

    #[test]
    fn test_registered_jobs_are_reported_and_removed() {
        let mut jobs = JobRegistry::new();
        jobs.insert(10, "sleep");
        jobs.insert(11, "yes");

        let script = vec![
            exited(10, 0),
            Ok(Poll::Terminated {
                pid: 11,
                status: ChildStatus::Signaled(15),
            }),
            Ok(Poll::NoChildren),
        ];
        let (n, out, _) = run(script, &mut jobs);

        assert_eq!(n, 2);
        assert_eq!(out, "[10] sleep Exit status 0\n[11] yes Exit signal 15\n");
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_unregistered_termination_is_consumed_silently() {
        let mut jobs = JobRegistry::new();
        jobs.insert(20, "make");

        let (n, out, polls) = run(vec![exited(99, 1), exited(20, 2)], &mut jobs);

        assert_eq!(n, 1);
        assert_eq!(out, "[20] make Exit status 2\n");
        // two terminations, then the exhausted script reports no children
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_same_pid_is_never_reported_twice() {
        let mut jobs = JobRegistry::new();
        jobs.insert(30, "true");

        let (n, out, _) = run(vec![exited(30, 0), exited(30, 0)], &mut jobs);

        assert_eq!(n, 1);
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_running_children_stop_the_sweep() {
        let mut jobs = JobRegistry::new();
        jobs.insert(40, "sleep");

        let (n, out, polls) = run(vec![Ok(Poll::Running), exited(40, 0)], &mut jobs);

        assert_eq!(n, 0);
        assert!(out.is_empty());
        assert_eq!(polls, 1);
        assert!(jobs.find_by_pid(40).is_some());
    }

    #[test]
    fn test_no_children_is_not_an_error() {
        let mut jobs = JobRegistry::new();
        let (n, out, polls) = run(vec![Ok(Poll::NoChildren)], &mut jobs);

        assert_eq!(n, 0);
        assert!(out.is_empty());
        assert_eq!(polls, 1);
    }

    #[test]
    fn test_poll_error_ends_sweep_quietly() {
        let mut jobs = JobRegistry::new();
        jobs.insert(50, "cat");

        let script = vec![Err(anyhow::anyhow!("EINVAL")), exited(50, 0)];
        let (n, out, polls) = run(script, &mut jobs);

        assert_eq!(n, 0);
        assert!(out.is_empty());
        assert_eq!(polls, 1);
        assert_eq!(jobs.len(), 1);
    }
}
