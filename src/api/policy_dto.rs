use serde::{Deserialize, Serialize};

/// Lightweight projection of a workflow sent across the policy boundary when it arrives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowProjectionDto {
    pub id: u32,
    pub tasks: Vec<TaskProjectionDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TaskProjectionDto {
    pub id: u32,
    pub length: u64,
    /// VMs run tasks on a single core.
    pub req_cores: u32,
    pub req_memory_mb: u64,
    pub child_ids: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStateDto {
    Ready,
    Blocked,
    Queued,
    Running,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TaskObservationDto {
    pub workflow_id: u32,
    pub task_id: u32,
    pub length: u64,
    pub req_memory_mb: u64,
    pub child_ids: Vec<u32>,
    pub state: TaskStateDto,
    pub vm_id: Option<u32>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct VmObservationDto {
    pub id: u32,
    pub host_id: u32,
    pub cpu_speed_mips: u64,
    pub memory_mb: u64,
    pub running_tasks: usize,
    /// Estimated time at which every task assigned so far has finished.
    pub free_at: f64,
}

/// Everything an external agent gets to see at a decision point.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ObservationDto {
    pub time: f64,
    pub tasks: Vec<TaskObservationDto>,
    pub vms: Vec<VmObservationDto>,
    /// Workflows that arrived but are still held back by the buffer.
    pub pending_workflows: Vec<WorkflowProjectionDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDto {
    Assign { workflow_id: u32, task_id: u32, vm_id: u32 },
    Proceed,
}

/// Frames exchanged with the external agent over the decision bridge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum BridgeMessage {
    Observation(ObservationDto),
    Action(ActionDto),
    Truncated,
}
