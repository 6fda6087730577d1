use std::fmt::Debug;

use crate::domain::dataset::dataset::Workflow;
use crate::domain::factory::cloudlet_factory::CloudletFactory;
use crate::domain::simulator::context::SimulationContext;
use crate::error::Result;

/// Receives the batches released by the workflow buffer.
pub trait WorkflowCoordinator: Debug {
    fn submit_workflows_to_system(&mut self, workflows: Vec<Workflow>, ctx: &mut SimulationContext) -> Result<()>;
}

/// Turns released tasks into cloudlets and registers them in the current run.
#[derive(Debug, Default)]
pub struct LocalWorkflowCoordinator {
    cloudlet_factory: CloudletFactory,
}

impl LocalWorkflowCoordinator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkflowCoordinator for LocalWorkflowCoordinator {
    fn submit_workflows_to_system(&mut self, workflows: Vec<Workflow>, ctx: &mut SimulationContext) -> Result<()> {
        for workflow in &workflows {
            for (cloudlet, task) in self.cloudlet_factory.create_cloudlets(workflow)? {
                ctx.cloudlets.register_new_cloudlet(cloudlet, task)?;
            }
            log::debug!("Workflow {} entered the system with {} tasks.", workflow.id, workflow.task_count());
        }
        Ok(())
    }
}
