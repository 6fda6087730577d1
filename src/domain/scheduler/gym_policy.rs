use crate::api::policy_dto::{ActionDto, ObservationDto, WorkflowProjectionDto};
use crate::bridge::channel::{AgentResult, DecisionChannel};
use crate::domain::scheduler::gym_mapper;
use crate::domain::scheduler::policy::{Action, SchedulerState, SchedulingPolicy, WorkflowReleaser};
use crate::domain::scheduler::release_mode::{ReleaseGate, ReleaseMode};
use crate::error::Result;

/// Delegates every decision to an external agent through the decision channel.
///
/// `decide` blocks until the agent answered. Once the channel reported truncation the policy
/// stays terminated and never publishes again.
#[derive(Debug)]
pub struct GymSchedulingPolicy {
    channel: DecisionChannel<ObservationDto, ActionDto>,
    release: ReleaseGate,
    /// Arrived workflows the buffer has not released yet.
    pending_workflows: Vec<WorkflowProjectionDto>,
    terminated: bool,
    decisions: usize,
}

impl GymSchedulingPolicy {
    pub fn new(channel: DecisionChannel<ObservationDto, ActionDto>, release_mode: ReleaseMode) -> Self {
        Self { channel, release: ReleaseGate::new(release_mode), pending_workflows: Vec::new(), terminated: false, decisions: 0 }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn decisions(&self) -> usize {
        self.decisions
    }
}

impl WorkflowReleaser for GymSchedulingPolicy {
    fn notify_new_workflow(&mut self, workflow: &WorkflowProjectionDto) {
        self.release.notify_new_workflow(workflow);
        self.pending_workflows.push(workflow.clone());
    }

    fn should_release(&mut self) -> bool {
        let release = self.release.should_release();
        if release {
            self.pending_workflows.clear();
        }
        release
    }
}

impl SchedulingPolicy for GymSchedulingPolicy {
    fn name(&self) -> &'static str {
        "gym"
    }

    fn decide(&mut self, state: &SchedulerState<'_>) -> Result<Action> {
        if self.terminated {
            return Ok(Action::Truncated);
        }

        let observation = gym_mapper::to_observation(state, &self.pending_workflows)?;
        match self.channel.publish_observation(observation)? {
            AgentResult::Continue(action) => {
                self.decisions += 1;
                log::debug!("Agent decision {} at {}: {:?}", self.decisions, state.time, action);
                Ok(gym_mapper::to_action(action))
            }
            AgentResult::Truncated => {
                log::info!("Agent channel truncated after {} decisions.", self.decisions);
                self.terminated = true;
                Ok(Action::Truncated)
            }
        }
    }
}
