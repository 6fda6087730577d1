use serde::{Deserialize, Serialize};

/// One completed task and where/when it ran.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct VmAssignmentDto {
    pub workflow_id: u32,
    pub task_id: u32,
    pub vm_id: u32,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SummaryDto {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_makespan: f64,
    pub last_finish_time: f64,
    pub average_host_utilization: f64,
    /// Host energy integrated up to `end_time`.
    pub total_energy_joule: f64,
    pub end_time: f64,
    pub truncated: bool,
}

/// Final report of one simulation run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SolutionDto {
    pub vm_assignments: Vec<VmAssignmentDto>,
    pub summary: SummaryDto,
}

impl SolutionDto {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
