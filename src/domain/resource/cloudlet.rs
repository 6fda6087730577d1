use crate::domain::resource::cloudlet_scheduler::ExecutionWindow;
use crate::domain::resource::registry::Identifiable;
use crate::domain::utils::id::{CloudletId, CloudletTag, VmId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudletStatus {
    /// Released into the system, not assigned to a VM yet.
    Created,
    /// Assigned, waiting for its start time on the VM.
    Queued,
    InExec,
    Success,
}

/// Runtime counterpart of a dataset task. Carries only a flat numeric id; the
/// `(workflow, task)` identity is kept by the cloudlet registry.
#[derive(Debug, Clone)]
pub struct Cloudlet {
    id: CloudletId,
    pub length: u64,
    pub req_memory_mb: u64,
    pub parent_ids: Vec<CloudletId>,
    pub child_ids: Vec<CloudletId>,
    status: CloudletStatus,
    vm_id: Option<VmId>,
    window: Option<ExecutionWindow>,
}

impl Cloudlet {
    pub fn new(id: CloudletId, length: u64, req_memory_mb: u64) -> Self {
        Self { id, length, req_memory_mb, parent_ids: Vec::new(), child_ids: Vec::new(), status: CloudletStatus::Created, vm_id: None, window: None }
    }

    pub fn status(&self) -> CloudletStatus {
        self.status
    }

    pub fn vm_id(&self) -> Option<VmId> {
        self.vm_id
    }

    pub fn has_started(&self) -> bool {
        matches!(self.status, CloudletStatus::InExec | CloudletStatus::Success)
    }

    pub fn is_finished(&self) -> bool {
        self.status == CloudletStatus::Success
    }

    /// Start time, once execution has begun.
    pub fn exec_start_time(&self) -> Option<f64> {
        self.window.filter(|_| self.has_started()).map(|window| window.start)
    }

    /// Finish time, once execution has completed.
    pub fn exec_finish_time(&self) -> Option<f64> {
        self.window.filter(|_| self.is_finished()).map(|window| window.finish)
    }

    /// Planned window, available as soon as the cloudlet is assigned.
    pub fn planned_window(&self) -> Option<ExecutionWindow> {
        self.window
    }

    pub(crate) fn assign(&mut self, vm_id: VmId, window: ExecutionWindow, now: f64) {
        self.vm_id = Some(vm_id);
        self.window = Some(window);
        self.status = CloudletStatus::Queued;
        self.advance(now);
    }

    /// Moves the status forward to what it is at `now`. Returns true if the cloudlet finished.
    pub(crate) fn advance(&mut self, now: f64) -> bool {
        let Some(window) = self.window else {
            return false;
        };

        if self.status == CloudletStatus::Queued && window.start <= now {
            self.status = CloudletStatus::InExec;
        }
        if self.status == CloudletStatus::InExec && window.finish <= now {
            self.status = CloudletStatus::Success;
            return true;
        }
        false
    }

    /// Earliest status change strictly after `now`.
    pub(crate) fn next_event_after(&self, now: f64) -> Option<f64> {
        let window = self.window?;
        match self.status {
            CloudletStatus::Queued if window.start > now => Some(window.start),
            CloudletStatus::Queued | CloudletStatus::InExec if window.finish > now => Some(window.finish),
            _ => None,
        }
    }
}

impl Identifiable for Cloudlet {
    type Tag = CloudletTag;
    const KIND: &'static str = "cloudlet";

    fn id(&self) -> CloudletId {
        self.id
    }
}
