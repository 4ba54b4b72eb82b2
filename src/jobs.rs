//! Bookkeeping for background processes that have been spawned but not yet reaped.

/// One outstanding background process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Process id assigned by the OS at spawn time.
    pub pid: i32,
    /// Program name token the job was launched with.
    pub command_name: String,
}

/// Collection of live background jobs keyed by pid.
///
/// The launcher inserts a job the moment a background child is spawned and the
/// reaper removes it once the child is confirmed terminated. Foreground children
/// are never registered. A pid is present at most once.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Vec<Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly spawned background child.
    ///
    /// If an entry with the same pid is still present it is stale (the OS
    /// already recycled the pid), so it is replaced and handed back.
    pub fn insert(&mut self, pid: i32, command_name: impl Into<String>) -> Option<Job> {
        let job = Job {
            pid,
            command_name: command_name.into(),
        };
        match self.jobs.iter_mut().find(|j| j.pid == pid) {
            Some(existing) => {
                log::warn!("pid {} was still registered as '{}'", pid, existing.command_name);
                Some(std::mem::replace(existing, job))
            }
            None => {
                log::debug!("registered job [{}] {}", job.pid, job.command_name);
                self.jobs.push(job);
                None
            }
        }
    }

    pub fn find_by_pid(&self, pid: i32) -> Option<&Job> {
        self.jobs.iter().find(|j| j.pid == pid)
    }

    /// Drop the job with this pid. Returns `None` when no such job exists.
    pub fn remove(&mut self, pid: i32) -> Option<Job> {
        let idx = self.jobs.iter().position(|j| j.pid == pid)?;
        let job = self.jobs.remove(idx);
        log::debug!("removed job [{}] {}", job.pid, job.command_name);
        Some(job)
    }

    /// Snapshot of all jobs in registry order.
    pub fn list_all(&self) -> Vec<Job> {
        self.jobs.clone()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
