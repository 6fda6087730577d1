use crate::api::policy_dto::WorkflowProjectionDto;
use crate::domain::scheduler::algorithm::SchedulingAlgorithm;
use crate::domain::scheduler::policy::{Action, Assignment, SchedulerState, SchedulingPolicy, WorkflowReleaser};
use crate::domain::scheduler::release_mode::{ReleaseGate, ReleaseMode};
use crate::error::{Error, Result};

/// Decides synchronously with an in-process algorithm, always for the first ready task.
#[derive(Debug)]
pub struct StaticSchedulingPolicy {
    algorithm: Box<dyn SchedulingAlgorithm>,
    release: ReleaseGate,
}

impl StaticSchedulingPolicy {
    pub fn new(algorithm: Box<dyn SchedulingAlgorithm>, release_mode: ReleaseMode) -> Self {
        Self { algorithm, release: ReleaseGate::new(release_mode) }
    }
}

impl WorkflowReleaser for StaticSchedulingPolicy {
    fn notify_new_workflow(&mut self, workflow: &WorkflowProjectionDto) {
        self.release.notify_new_workflow(workflow);
    }

    fn should_release(&mut self) -> bool {
        self.release.should_release()
    }
}

impl SchedulingPolicy for StaticSchedulingPolicy {
    fn name(&self) -> &'static str {
        self.algorithm.name()
    }

    fn decide(&mut self, state: &SchedulerState<'_>) -> Result<Action> {
        let Some(task) = state.ready_tasks.first().copied() else {
            return Ok(Action::Proceed);
        };

        let cloudlet = state.context.cloudlets.lookup(state.context.cloudlets.cloudlet_of(task)?)?;
        let candidates = state.context.vms.suitable_for(cloudlet.req_memory_mb);
        if candidates.is_empty() {
            return Err(Error::NoSuitableVm { workflow_id: task.workflow_id.value(), task_id: task.task_id.value() });
        }

        let vm_id = self.algorithm.select_vm(cloudlet, &candidates, state)?;
        Ok(Action::Assign(Assignment { task, vm_id }))
    }
}
