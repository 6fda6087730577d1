use std::collections::BTreeMap;

use crate::domain::dataset::dataset::Workflow;
use crate::domain::resource::cloudlet::Cloudlet;
use crate::domain::utils::id::{CloudletId, TaskId, WorkflowTaskId};
use crate::error::{Error, Result};

/// Turns dataset tasks into runtime cloudlets with flat sequential ids.
#[derive(Debug, Default)]
pub struct CloudletFactory {
    next_id: u32,
}

impl CloudletFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one cloudlet per task of `workflow`. Dependencies are resolved inside the
    /// workflow, task ids do not reach across workflows.
    pub fn create_cloudlets(&mut self, workflow: &Workflow) -> Result<Vec<(Cloudlet, WorkflowTaskId)>> {
        let id_map: BTreeMap<TaskId, CloudletId> = workflow
            .tasks
            .iter()
            .enumerate()
            .map(|(offset, task)| (task.id, CloudletId::new(self.next_id + offset as u32)))
            .collect();

        let mut cloudlets: Vec<(Cloudlet, WorkflowTaskId)> = workflow
            .tasks
            .iter()
            .map(|task| (Cloudlet::new(id_map[&task.id], task.length, task.req_memory_mb), task.key()))
            .collect();

        for (index, task) in workflow.tasks.iter().enumerate() {
            let parent_id = id_map[&task.id];
            for child in &task.child_ids {
                let child_id = *id_map.get(child).ok_or(Error::UnknownEntity { kind: "task", id: child.value() })?;
                cloudlets[index].0.child_ids.push(child_id);
                let child_index = (child_id.value() - self.next_id) as usize;
                cloudlets[child_index].0.parent_ids.push(parent_id);
            }
        }

        self.next_id += workflow.tasks.len() as u32;
        Ok(cloudlets)
    }
}
