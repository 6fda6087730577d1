use std::collections::BTreeSet;

use crate::api::dataset_dto::{CloudletSchedulerDto, DatasetDto, HostDto, TaskDto, VmDto, WorkflowDto};
use crate::api::policy_dto::{TaskProjectionDto, WorkflowProjectionDto};
use crate::domain::dataset::validation;
use crate::domain::utils::id::{HostId, TaskId, VmId, WorkflowId, WorkflowTaskId};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub workflow_id: WorkflowId,
    /// Work units (MI).
    pub length: u64,
    pub req_memory_mb: u64,
    pub child_ids: BTreeSet<TaskId>,
}

impl Task {
    pub fn key(&self) -> WorkflowTaskId {
        WorkflowTaskId::new(self.workflow_id, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub id: WorkflowId,
    pub arrival_time: u32,
    pub tasks: Vec<Task>,
}

impl Workflow {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// What a scheduling policy learns about the workflow when it arrives.
    pub fn projection(&self) -> WorkflowProjectionDto {
        WorkflowProjectionDto {
            id: self.id.value(),
            tasks: self
                .tasks
                .iter()
                .map(|task| TaskProjectionDto {
                    id: task.id.value(),
                    length: task.length,
                    req_cores: 1,
                    req_memory_mb: task.req_memory_mb,
                    child_ids: task.child_ids.iter().map(|child| child.value()).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloudletSchedulerKind {
    /// Every cloudlet gets the full VM speed, no matter how many run at once.
    #[default]
    TimeSharedFixed,
    /// Cloudlets run one after another in submission order.
    SpaceShared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VmDescriptor {
    pub id: VmId,
    pub host_id: HostId,
    pub cores: u32,
    pub cpu_speed_mips: u64,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub bandwidth_mbps: u64,
    pub vmm: String,
    pub cloudlet_scheduler: CloudletSchedulerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostDescriptor {
    pub id: HostId,
    pub cores: u32,
    /// Total speed over all cores.
    pub cpu_speed_mips: u64,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub bandwidth_mbps: u64,
    pub power_idle_watt: f64,
    pub power_peak_watt: f64,
}

/// Validated, immutable input of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub workflows: Vec<Workflow>,
    pub vms: Vec<VmDescriptor>,
    pub hosts: Vec<HostDescriptor>,
}

impl Dataset {
    /// Converts the parsed document into the domain model.
    ///
    /// The whole document is checked before anything is returned, so a malformed
    /// dataset never reaches entity construction.
    pub fn from_dto(dto: DatasetDto) -> Result<Self> {
        validation::validate(&dto)?;

        Ok(Dataset {
            workflows: dto.workflows.into_iter().map(map_workflow).collect(),
            vms: dto.vms.into_iter().map(map_vm).collect(),
            hosts: dto.hosts.into_iter().map(map_host).collect(),
        })
    }

    pub fn task_count(&self) -> usize {
        self.workflows.iter().map(Workflow::task_count).sum()
    }
}

fn map_workflow(dto: WorkflowDto) -> Workflow {
    Workflow { id: WorkflowId::new(dto.id), arrival_time: dto.arrival_time, tasks: dto.tasks.into_iter().map(map_task).collect() }
}

fn map_task(dto: TaskDto) -> Task {
    Task {
        id: TaskId::new(dto.id),
        workflow_id: WorkflowId::new(dto.workflow_id),
        length: dto.length,
        req_memory_mb: dto.req_memory_mb,
        child_ids: dto.child_ids.into_iter().map(TaskId::new).collect(),
    }
}

fn map_vm(dto: VmDto) -> VmDescriptor {
    VmDescriptor {
        id: VmId::new(dto.id),
        host_id: HostId::new(dto.host_id),
        cores: dto.cores,
        cpu_speed_mips: dto.cpu_speed_mips,
        memory_mb: dto.memory_mb,
        disk_mb: dto.disk_mb,
        bandwidth_mbps: dto.bandwidth_mbps,
        vmm: dto.vmm,
        cloudlet_scheduler: match dto.cloudlet_scheduler {
            CloudletSchedulerDto::TimeSharedFixed => CloudletSchedulerKind::TimeSharedFixed,
            CloudletSchedulerDto::SpaceShared => CloudletSchedulerKind::SpaceShared,
        },
    }
}

fn map_host(dto: HostDto) -> HostDescriptor {
    HostDescriptor {
        id: HostId::new(dto.id),
        cores: dto.cores,
        cpu_speed_mips: dto.cpu_speed_mips,
        memory_mb: dto.memory_mb,
        disk_mb: dto.disk_mb,
        bandwidth_mbps: dto.bandwidth_mbps,
        power_idle_watt: dto.power_idle_watt,
        power_peak_watt: dto.power_peak_watt,
    }
}
