use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::domain::admission::buffer::WorkflowBuffer;
use crate::domain::dataset::dataset::Workflow;
use crate::domain::scheduler::policy::WorkflowReleaser;
use crate::domain::simulator::context::SimulationContext;
use crate::domain::simulator::tick_listener::TickListener;
use crate::error::Result;

/// Forwards workflows to the buffer once their arrival time is reached.
pub struct WorkflowSubmitter<R: WorkflowReleaser + ?Sized> {
    backlog: VecDeque<Workflow>,
    buffer: Rc<RefCell<WorkflowBuffer<R>>>,
    forwarded: usize,
}

impl<R: WorkflowReleaser + ?Sized> WorkflowSubmitter<R> {
    /// Orders the backlog by arrival time; workflows arriving together keep their dataset order.
    pub fn new(mut workflows: Vec<Workflow>, buffer: Rc<RefCell<WorkflowBuffer<R>>>) -> Self {
        workflows.sort_by_key(|workflow| workflow.arrival_time);
        Self { backlog: workflows.into(), buffer, forwarded: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.backlog.len()
    }

    pub fn forwarded(&self) -> usize {
        self.forwarded
    }
}

impl<R: WorkflowReleaser + ?Sized> TickListener for WorkflowSubmitter<R> {
    fn name(&self) -> &'static str {
        "workflow-submitter"
    }

    fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()> {
        while self.backlog.front().is_some_and(|workflow| workflow.arrival_time as f64 <= time) {
            if let Some(workflow) = self.backlog.pop_front() {
                log::debug!("Workflow {} arrived at {} (due {}).", workflow.id, time, workflow.arrival_time);
                self.buffer.borrow_mut().submit(workflow, ctx);
                self.forwarded += 1;
            }
        }
        Ok(())
    }

    /// Nothing left to forward.
    fn is_done(&self) -> bool {
        self.backlog.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::admission::coordinator::LocalWorkflowCoordinator;
    use crate::domain::scheduler::release_mode::{ReleaseGate, ReleaseMode};
    use crate::domain::utils::id::WorkflowId;

    fn workflow(id: u32, arrival_time: u32) -> Workflow {
        Workflow { id: WorkflowId::new(id), arrival_time, tasks: Vec::new() }
    }

    #[test]
    fn forwards_in_arrival_order_once_due() {
        let releaser = Rc::new(RefCell::new(ReleaseGate::new(ReleaseMode::EveryTicks(100))));
        let buffer = Rc::new(RefCell::new(WorkflowBuffer::new(releaser, Box::new(LocalWorkflowCoordinator::new()))));
        let mut submitter = WorkflowSubmitter::new(vec![workflow(0, 5), workflow(1, 2), workflow(2, 2)], buffer.clone());
        let mut ctx = SimulationContext::new();

        submitter.on_tick(1.0, &mut ctx).unwrap();
        assert_eq!(submitter.forwarded(), 0);

        submitter.on_tick(2.0, &mut ctx).unwrap();
        assert_eq!(submitter.forwarded(), 2);
        assert_eq!(buffer.borrow().cached_workflows(), 2);
        assert!(!submitter.is_done());

        submitter.on_tick(5.5, &mut ctx).unwrap();
        assert_eq!(submitter.remaining(), 0);
        assert!(submitter.is_done());
    }
}
