use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::scheduler::policy::{Action, Assignment, SchedulerState, SchedulingPolicy};
use crate::domain::simulator::context::SimulationContext;
use crate::domain::simulator::tick_listener::TickListener;
use crate::domain::utils::id::WorkflowTaskId;
use crate::error::{Error, Result};

/// Asks the active policy for decisions while tasks are ready and applies them.
pub struct SchedulingListener {
    policy: Rc<RefCell<dyn SchedulingPolicy>>,
    assignments: usize,
}

impl SchedulingListener {
    pub fn new(policy: Rc<RefCell<dyn SchedulingPolicy>>) -> Self {
        Self { policy, assignments: 0 }
    }

    pub fn assignments(&self) -> usize {
        self.assignments
    }

    fn ready_tasks(ctx: &SimulationContext) -> Result<Vec<WorkflowTaskId>> {
        ctx.cloudlets.ready_cloudlets()?.into_iter().map(|id| ctx.cloudlets.task_of(id)).collect()
    }

    fn apply(&mut self, assignment: Assignment, time: f64, ctx: &mut SimulationContext) -> Result<()> {
        let task = assignment.task;
        let cloudlet_id = ctx
            .cloudlets
            .cloudlet_of(task)
            .map_err(|_| Error::InvalidAction(format!("task {} was not released into the system", task)))?;
        let vm = ctx.vms.lookup_mut(assignment.vm_id).map_err(|_| Error::InvalidAction(format!("unknown vm {}", assignment.vm_id)))?;

        ctx.cloudlets.assign(cloudlet_id, vm, time)?;
        self.assignments += 1;
        Ok(())
    }
}

impl TickListener for SchedulingListener {
    fn name(&self) -> &'static str {
        "scheduling"
    }

    fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()> {
        loop {
            let ready = Self::ready_tasks(ctx)?;
            if ready.is_empty() {
                return Ok(());
            }

            let action = {
                let state = SchedulerState { time, ready_tasks: &ready, context: ctx };
                self.policy.borrow_mut().decide(&state)?
            };

            match action {
                Action::Assign(assignment) => self.apply(assignment, time, ctx)?,
                Action::Proceed => return Ok(()),
                Action::Truncated => {
                    ctx.truncate();
                    return Ok(());
                }
            }
        }
    }
}
