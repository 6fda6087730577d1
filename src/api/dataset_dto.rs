use serde::{Deserialize, Serialize};

/// Root of the dataset document: the workload plus the cluster it runs on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DatasetDto {
    pub workflows: Vec<WorkflowDto>,
    pub vms: Vec<VmDto>,
    pub hosts: Vec<HostDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowDto {
    pub id: u32,
    pub arrival_time: u32,
    pub tasks: Vec<TaskDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TaskDto {
    pub id: u32,
    pub workflow_id: u32,
    pub length: u64,
    pub req_memory_mb: u64,
    #[serde(default)]
    pub child_ids: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CloudletSchedulerDto {
    #[default]
    TimeSharedFixed,
    SpaceShared,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct VmDto {
    pub id: u32,
    pub host_id: u32,
    #[serde(default = "default_vm_cores")]
    pub cores: u32,
    pub cpu_speed_mips: u64,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub bandwidth_mbps: u64,
    #[serde(default = "default_vmm")]
    pub vmm: String,
    #[serde(default)]
    pub cloudlet_scheduler: CloudletSchedulerDto,
}

fn default_vm_cores() -> u32 {
    1
}

fn default_vmm() -> String {
    "Xen".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct HostDto {
    pub id: u32,
    pub cores: u32,
    pub cpu_speed_mips: u64,
    pub memory_mb: u64,
    pub disk_mb: u64,
    pub bandwidth_mbps: u64,
    pub power_idle_watt: f64,
    pub power_peak_watt: f64,
}
