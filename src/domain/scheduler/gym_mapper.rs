use crate::api::policy_dto::{ActionDto, ObservationDto, TaskObservationDto, TaskStateDto, VmObservationDto, WorkflowProjectionDto};
use crate::domain::resource::cloudlet::{Cloudlet, CloudletStatus};
use crate::domain::resource::registry::Identifiable;
use crate::domain::scheduler::policy::{Action, Assignment, SchedulerState};
use crate::domain::utils::id::{TaskId, VmId, WorkflowId, WorkflowTaskId};
use crate::error::Result;

/// Serializable snapshot of the registries for an external agent.
pub fn to_observation(state: &SchedulerState<'_>, pending_workflows: &[WorkflowProjectionDto]) -> Result<ObservationDto> {
    let cloudlets = &state.context.cloudlets;

    let mut tasks = Vec::with_capacity(cloudlets.len());
    for cloudlet in cloudlets.iter() {
        let key = cloudlets.task_of(cloudlet.id())?;
        let child_ids = cloudlet.child_ids.iter().map(|child| cloudlets.task_of(*child).map(|t| t.task_id.value())).collect::<Result<_>>()?;

        tasks.push(TaskObservationDto {
            workflow_id: key.workflow_id.value(),
            task_id: key.task_id.value(),
            length: cloudlet.length,
            req_memory_mb: cloudlet.req_memory_mb,
            child_ids,
            state: task_state(cloudlet, cloudlets.is_ready(cloudlet)?),
            vm_id: cloudlet.vm_id().map(|vm_id| vm_id.value()),
            start_time: cloudlet.exec_start_time(),
            end_time: cloudlet.exec_finish_time(),
        });
    }

    let vms = state
        .context
        .vms
        .iter()
        .map(|vm| VmObservationDto {
            id: vm.descriptor.id.value(),
            host_id: vm.host_id().value(),
            cpu_speed_mips: vm.mips(),
            memory_mb: vm.memory_mb(),
            running_tasks: cloudlets.running_on_vm(vm.descriptor.id),
            free_at: cloudlets.estimated_vm_free_at(vm.descriptor.id, state.time),
        })
        .collect();

    Ok(ObservationDto { time: state.time, tasks, vms, pending_workflows: pending_workflows.to_vec() })
}

fn task_state(cloudlet: &Cloudlet, ready: bool) -> TaskStateDto {
    match cloudlet.status() {
        CloudletStatus::Created if ready => TaskStateDto::Ready,
        CloudletStatus::Created => TaskStateDto::Blocked,
        CloudletStatus::Queued => TaskStateDto::Queued,
        CloudletStatus::InExec => TaskStateDto::Running,
        CloudletStatus::Success => TaskStateDto::Completed,
    }
}

pub fn to_action(action: ActionDto) -> Action {
    match action {
        ActionDto::Assign { workflow_id, task_id, vm_id } => Action::Assign(Assignment {
            task: WorkflowTaskId::new(WorkflowId::new(workflow_id), TaskId::new(task_id)),
            vm_id: VmId::new(vm_id),
        }),
        ActionDto::Proceed => Action::Proceed,
    }
}
