use bimap::BiMap;
use std::collections::BTreeMap;

use crate::api::solution_dto::VmAssignmentDto;
use crate::domain::resource::cloudlet::{Cloudlet, CloudletStatus};
use crate::domain::resource::registry::{Identifiable, Registry};
use crate::domain::resource::vm::Vm;
use crate::domain::utils::id::{CloudletId, VmId, WorkflowId, WorkflowTaskId};
use crate::error::{Error, Result};

/// Holds the cloudlets released into the system.
///
/// Every aggregate is recomputed from the current cloudlets on each call.
#[derive(Debug, Default)]
pub struct CloudletRegistry {
    cloudlets: Registry<Cloudlet>,

    /// Cloudlet id <-> (workflow id, task id), filled at registration.
    cloudlet_map: BiMap<CloudletId, WorkflowTaskId>,
}

impl CloudletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cloudlet created for `task`. A task can only enter the system once.
    pub fn register_new_cloudlet(&mut self, cloudlet: Cloudlet, task: WorkflowTaskId) -> Result<()> {
        if self.cloudlet_map.contains_right(&task) {
            return Err(Error::DuplicateRelease { workflow_id: task.workflow_id.value(), task_id: task.task_id.value() });
        }

        let cloudlet_id = cloudlet.id();
        self.cloudlets.register(cloudlet)?;
        self.cloudlet_map.insert(cloudlet_id, task);
        Ok(())
    }

    pub fn lookup(&self, id: CloudletId) -> Result<&Cloudlet> {
        self.cloudlets.lookup(id)
    }

    pub fn task_of(&self, id: CloudletId) -> Result<WorkflowTaskId> {
        self.cloudlet_map.get_by_left(&id).copied().ok_or(Error::UnknownEntity { kind: "cloudlet", id: id.value() })
    }

    pub fn cloudlet_of(&self, task: WorkflowTaskId) -> Result<CloudletId> {
        self.cloudlet_map.get_by_right(&task).copied().ok_or(Error::UnknownEntity { kind: "task", id: task.task_id.value() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloudlet> {
        self.cloudlets.values()
    }

    pub fn len(&self) -> usize {
        self.cloudlets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloudlets.is_empty()
    }

    /// Created cloudlets whose parents have all finished, in id order.
    pub fn ready_cloudlets(&self) -> Result<Vec<CloudletId>> {
        let mut ready = Vec::new();
        for cloudlet in self.cloudlets.values().filter(|c| c.status() == CloudletStatus::Created) {
            if self.is_ready(cloudlet)? {
                ready.push(cloudlet.id());
            }
        }
        Ok(ready)
    }

    pub fn is_ready(&self, cloudlet: &Cloudlet) -> Result<bool> {
        if cloudlet.status() != CloudletStatus::Created {
            return Ok(false);
        }
        for parent_id in &cloudlet.parent_ids {
            if !self.cloudlets.lookup(*parent_id)?.is_finished() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Submits a ready cloudlet to `vm`; its execution window is decided by the VM's scheduler.
    pub fn assign(&mut self, id: CloudletId, vm: &mut Vm, now: f64) -> Result<()> {
        let cloudlet = self.cloudlets.lookup(id)?;
        if !self.is_ready(cloudlet)? {
            return Err(Error::InvalidAction(format!("cloudlet {} is not ready for execution", id)));
        }
        if !vm.is_suitable_for(cloudlet.req_memory_mb) {
            return Err(Error::InvalidAction(format!(
                "vm {} has {} MB but cloudlet {} needs {} MB",
                vm.descriptor.id,
                vm.memory_mb(),
                id,
                cloudlet.req_memory_mb
            )));
        }

        let window = vm.submit(cloudlet.length, now);
        let vm_id = vm.descriptor.id;
        self.cloudlets.lookup_mut(id)?.assign(vm_id, window, now);
        log::debug!("Cloudlet {} assigned to VM {}, runs {:.3} -> {:.3}.", id, vm_id, window.start, window.finish);
        Ok(())
    }

    /// Brings every cloudlet up to `now` and returns the ones that finished.
    pub fn advance_to(&mut self, now: f64) -> Vec<CloudletId> {
        self.cloudlets.values_mut().filter_map(|cloudlet| cloudlet.advance(now).then(|| cloudlet.id())).collect()
    }

    pub fn next_event_after(&self, now: f64) -> Option<f64> {
        self.cloudlets.values().filter_map(|cloudlet| cloudlet.next_event_after(now)).min_by(f64::total_cmp)
    }

    pub fn running_cloudlet_count(&self) -> usize {
        self.cloudlets.values().filter(|c| c.status() == CloudletStatus::InExec).count()
    }

    pub fn running_on_vm(&self, vm_id: VmId) -> usize {
        self.cloudlets.values().filter(|c| c.status() == CloudletStatus::InExec && c.vm_id() == Some(vm_id)).count()
    }

    pub fn completed_cloudlet_count(&self) -> usize {
        self.cloudlets.values().filter(|c| c.is_finished()).count()
    }

    pub fn total_cloudlet_length(&self) -> u64 {
        self.cloudlets.values().map(|c| c.length).sum()
    }

    /// Finish time of the last completed cloudlet, 0 if none completed.
    pub fn last_cloudlet_finished_at(&self) -> f64 {
        self.cloudlets.values().filter_map(Cloudlet::exec_finish_time).fold(0.0, f64::max)
    }

    /// Time at which everything assigned to `vm_id` so far is done, at least `now`.
    pub fn estimated_vm_free_at(&self, vm_id: VmId, now: f64) -> f64 {
        self.cloudlets
            .values()
            .filter(|c| c.vm_id() == Some(vm_id))
            .filter_map(|c| c.planned_window())
            .map(|window| window.finish)
            .fold(now, f64::max)
    }

    /// max(finish) - min(start) over the workflow's cloudlets; `None` until one started and one finished.
    pub fn workflow_makespan(&self, workflow_id: WorkflowId) -> Option<f64> {
        self.makespans().remove(&workflow_id).flatten()
    }

    /// Sum of the defined workflow makespans.
    pub fn total_makespan(&self) -> f64 {
        self.makespans().values().flatten().sum()
    }

    fn makespans(&self) -> BTreeMap<WorkflowId, Option<f64>> {
        let mut bounds: BTreeMap<WorkflowId, (Option<f64>, Option<f64>)> = BTreeMap::new();

        for cloudlet in self.cloudlets.values() {
            let Some(task) = self.cloudlet_map.get_by_left(&cloudlet.id()) else {
                continue;
            };
            let (start, finish) = bounds.entry(task.workflow_id).or_default();
            if let Some(s) = cloudlet.exec_start_time() {
                *start = Some(start.map_or(s, |current: f64| current.min(s)));
            }
            if let Some(f) = cloudlet.exec_finish_time() {
                *finish = Some(finish.map_or(f, |current: f64| current.max(f)));
            }
        }

        bounds.into_iter().map(|(workflow_id, (start, finish))| (workflow_id, start.zip(finish).map(|(s, f)| f - s))).collect()
    }

    /// Assignment records of completed cloudlets, in cloudlet id order.
    pub fn vm_assignments(&self) -> Result<Vec<VmAssignmentDto>> {
        let mut assignments = Vec::new();
        for cloudlet in self.cloudlets.values().filter(|c| c.is_finished()) {
            let task = self.task_of(cloudlet.id())?;
            let (Some(vm_id), Some(start_time), Some(end_time)) = (cloudlet.vm_id(), cloudlet.exec_start_time(), cloudlet.exec_finish_time())
            else {
                return Err(Error::InvalidAction(format!("completed cloudlet {} has no execution record", cloudlet.id())));
            };
            assignments.push(VmAssignmentDto {
                workflow_id: task.workflow_id.value(),
                task_id: task.task_id.value(),
                vm_id: vm_id.value(),
                start_time,
                end_time,
            });
        }
        Ok(assignments)
    }
}
