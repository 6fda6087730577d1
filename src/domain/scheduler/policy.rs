use crate::api::policy_dto::WorkflowProjectionDto;
use crate::domain::simulator::context::SimulationContext;
use crate::domain::utils::id::{VmId, WorkflowTaskId};
use crate::error::Result;

/// Decides when the workflow buffer hands its cached workflows to the system.
pub trait WorkflowReleaser {
    /// Called by the buffer for every workflow that arrived.
    fn notify_new_workflow(&mut self, workflow: &WorkflowProjectionDto);

    /// Called by the buffer once per tick. `true` releases the whole cache.
    fn should_release(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub task: WorkflowTaskId,
    pub vm_id: VmId,
}

/// Outcome of one scheduling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Assign(Assignment),
    /// No more decisions at this instant.
    Proceed,
    /// The decision source was shut down; the run ends after the current tick.
    Truncated,
}

/// Read-only view a policy decides on.
#[derive(Debug)]
pub struct SchedulerState<'a> {
    pub time: f64,
    /// Released, unassigned tasks whose parents have all finished, in release order.
    pub ready_tasks: &'a [WorkflowTaskId],
    pub context: &'a SimulationContext,
}

/// A scheduling policy: takes decisions for ready tasks and controls admission through the
/// [`WorkflowReleaser`] hooks.
///
/// Implementations either decide in-process or delegate every decision to an external agent.
pub trait SchedulingPolicy: WorkflowReleaser {
    fn name(&self) -> &'static str;

    /// Produces the next decision. Only called while at least one task is ready.
    fn decide(&mut self, state: &SchedulerState<'_>) -> Result<Action>;
}
