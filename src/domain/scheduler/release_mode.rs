use std::fmt;
use std::str::FromStr;

use crate::api::policy_dto::WorkflowProjectionDto;
use crate::domain::scheduler::policy::WorkflowReleaser;
use crate::error::Error;

/// When the workflow buffer flushes its cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// On every tick.
    #[default]
    Immediate,
    /// On every n-th tick.
    EveryTicks(u32),
    /// As soon as at least k tasks arrived since the last release.
    PendingTasks(usize),
}

impl FromStr for ReleaseMode {
    type Err = Error;

    fn from_str(mode: &str) -> Result<ReleaseMode, Self::Err> {
        let invalid = || Error::InvalidConfig(format!("unknown release mode '{}', expected immediate, every:N or pending:K", mode));

        match mode.split_once(':') {
            None if mode == "immediate" => Ok(ReleaseMode::Immediate),
            Some(("every", n)) => match n.parse::<u32>() {
                Ok(n) if n > 0 => Ok(ReleaseMode::EveryTicks(n)),
                _ => Err(invalid()),
            },
            Some(("pending", k)) => match k.parse::<usize>() {
                Ok(k) if k > 0 => Ok(ReleaseMode::PendingTasks(k)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseMode::Immediate => write!(f, "immediate"),
            ReleaseMode::EveryTicks(n) => write!(f, "every:{}", n),
            ReleaseMode::PendingTasks(k) => write!(f, "pending:{}", k),
        }
    }
}

/// Releaser state shared by both policy variants.
#[derive(Debug, Clone, Default)]
pub struct ReleaseGate {
    mode: ReleaseMode,
    ticks: u64,
    pending_tasks: usize,
}

impl ReleaseGate {
    pub fn new(mode: ReleaseMode) -> Self {
        Self { mode, ticks: 0, pending_tasks: 0 }
    }

    pub fn mode(&self) -> ReleaseMode {
        self.mode
    }

    pub fn pending_tasks(&self) -> usize {
        self.pending_tasks
    }
}

impl WorkflowReleaser for ReleaseGate {
    fn notify_new_workflow(&mut self, workflow: &WorkflowProjectionDto) {
        self.pending_tasks += workflow.tasks.len();
    }

    fn should_release(&mut self) -> bool {
        self.ticks += 1;
        let release = match self.mode {
            ReleaseMode::Immediate => true,
            ReleaseMode::EveryTicks(n) => self.ticks % n as u64 == 0,
            ReleaseMode::PendingTasks(k) => self.pending_tasks >= k,
        };
        if release {
            self.pending_tasks = 0;
        }
        release
    }
}
