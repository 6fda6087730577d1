use std::fmt::Debug;

use crate::domain::dataset::dataset::CloudletSchedulerKind;

/// Start and finish time of a cloudlet on its VM, fixed at submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionWindow {
    pub start: f64,
    pub finish: f64,
}

/// Decides when a cloudlet submitted to a VM runs.
pub trait CloudletScheduler: Debug {
    fn kind(&self) -> CloudletSchedulerKind;

    fn submit(&mut self, length: u64, mips: u64, now: f64) -> ExecutionWindow;
}

pub fn new_cloudlet_scheduler(kind: CloudletSchedulerKind) -> Box<dyn CloudletScheduler> {
    match kind {
        CloudletSchedulerKind::TimeSharedFixed => Box::new(TimeSharedFixedScheduler),
        CloudletSchedulerKind::SpaceShared => Box::new(SpaceSharedScheduler::default()),
    }
}

/// Each cloudlet runs at the full VM speed from the moment it is submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSharedFixedScheduler;

impl CloudletScheduler for TimeSharedFixedScheduler {
    fn kind(&self) -> CloudletSchedulerKind {
        CloudletSchedulerKind::TimeSharedFixed
    }

    fn submit(&mut self, length: u64, mips: u64, now: f64) -> ExecutionWindow {
        ExecutionWindow { start: now, finish: now + length as f64 / mips as f64 }
    }
}

/// FIFO: a cloudlet starts when the previous one on the VM has finished.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceSharedScheduler {
    busy_until: f64,
}

impl CloudletScheduler for SpaceSharedScheduler {
    fn kind(&self) -> CloudletSchedulerKind {
        CloudletSchedulerKind::SpaceShared
    }

    fn submit(&mut self, length: u64, mips: u64, now: f64) -> ExecutionWindow {
        let start = self.busy_until.max(now);
        let finish = start + length as f64 / mips as f64;
        self.busy_until = finish;
        ExecutionWindow { start, finish }
    }
}
