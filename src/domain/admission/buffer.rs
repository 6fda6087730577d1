use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::admission::coordinator::WorkflowCoordinator;
use crate::domain::dataset::dataset::Workflow;
use crate::domain::scheduler::policy::WorkflowReleaser;
use crate::domain::simulator::context::SimulationContext;
use crate::domain::simulator::tick_listener::TickListener;
use crate::error::Result;

/// Holds arrived workflows until the releaser lets them into the system.
///
/// Every tick the releaser is asked once; on `true` the whole cache goes out as one batch.
pub struct WorkflowBuffer<R: WorkflowReleaser + ?Sized> {
    releaser: Rc<RefCell<R>>,
    coordinator: Box<dyn WorkflowCoordinator>,
    cache: Vec<Workflow>,
    released_batches: usize,
}

impl<R: WorkflowReleaser + ?Sized> WorkflowBuffer<R> {
    pub fn new(releaser: Rc<RefCell<R>>, coordinator: Box<dyn WorkflowCoordinator>) -> Self {
        Self { releaser, coordinator, cache: Vec::new(), released_batches: 0 }
    }

    /// Accepts a workflow forwarded by the submitter.
    pub fn submit(&mut self, workflow: Workflow, ctx: &mut SimulationContext) {
        ctx.task_states.buffer_tasks(workflow.task_count());
        let projection = workflow.projection();
        self.cache.push(workflow);
        self.releaser.borrow_mut().notify_new_workflow(&projection);
    }

    pub fn cached_workflows(&self) -> usize {
        self.cache.len()
    }

    pub fn released_batches(&self) -> usize {
        self.released_batches
    }
}

impl<R: WorkflowReleaser + ?Sized> TickListener for WorkflowBuffer<R> {
    fn name(&self) -> &'static str {
        "workflow-buffer"
    }

    fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()> {
        if !self.releaser.borrow_mut().should_release() || self.cache.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(&mut self.cache);
        let task_count = batch.iter().map(Workflow::task_count).sum();
        ctx.task_states.release_tasks(task_count)?;

        log::debug!("Releasing {} workflows ({} tasks) at {}.", batch.len(), task_count, time);
        self.coordinator.submit_workflows_to_system(batch, ctx)?;
        self.released_batches += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::policy_dto::WorkflowProjectionDto;
    use crate::domain::admission::coordinator::LocalWorkflowCoordinator;
    use crate::domain::dataset::dataset::Task;
    use crate::domain::utils::id::{TaskId, WorkflowId};

    #[derive(Default)]
    struct ScriptedReleaser {
        answers: Vec<bool>,
        notified: Vec<u32>,
        asked: usize,
    }

    impl WorkflowReleaser for ScriptedReleaser {
        fn notify_new_workflow(&mut self, workflow: &WorkflowProjectionDto) {
            self.notified.push(workflow.id);
        }

        fn should_release(&mut self) -> bool {
            self.asked += 1;
            self.answers.get(self.asked - 1).copied().unwrap_or(true)
        }
    }

    fn workflow(id: u32, tasks: u32) -> Workflow {
        let tasks = (0..tasks)
            .map(|task| Task { id: TaskId::new(task), workflow_id: WorkflowId::new(id), length: 10, req_memory_mb: 0, child_ids: Default::default() })
            .collect();
        Workflow { id: WorkflowId::new(id), arrival_time: 0, tasks }
    }

    #[test]
    fn cache_is_flushed_as_one_batch_when_the_releaser_agrees() {
        let releaser = Rc::new(RefCell::new(ScriptedReleaser { answers: vec![false, true], ..Default::default() }));
        let mut buffer = WorkflowBuffer::new(releaser.clone(), Box::new(LocalWorkflowCoordinator::new()));
        let mut ctx = SimulationContext::new();

        buffer.submit(workflow(0, 2), &mut ctx);
        buffer.submit(workflow(1, 3), &mut ctx);
        assert_eq!(releaser.borrow().notified, vec![0, 1]);
        assert_eq!(ctx.task_states.buffered_tasks(), 5);

        buffer.on_tick(0.0, &mut ctx).unwrap();
        assert_eq!(buffer.cached_workflows(), 2);
        assert!(ctx.cloudlets.is_empty());

        buffer.on_tick(1.0, &mut ctx).unwrap();
        assert_eq!(buffer.cached_workflows(), 0);
        assert_eq!(buffer.released_batches(), 1);
        assert_eq!(ctx.task_states.released_tasks(), 5);
        assert_eq!(ctx.task_states.buffered_tasks(), 0);
        assert_eq!(ctx.cloudlets.len(), 5);
    }

    #[test]
    fn empty_cache_consults_the_releaser_but_releases_nothing() {
        let releaser = Rc::new(RefCell::new(ScriptedReleaser::default()));
        let mut buffer = WorkflowBuffer::new(releaser.clone(), Box::new(LocalWorkflowCoordinator::new()));
        let mut ctx = SimulationContext::new();

        buffer.on_tick(0.0, &mut ctx).unwrap();
        assert_eq!(releaser.borrow().asked, 1);
        assert_eq!(buffer.released_batches(), 0);
    }
}
