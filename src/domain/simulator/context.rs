use crate::domain::resource::cloudlet_registry::CloudletRegistry;
use crate::domain::resource::host_registry::HostRegistry;
use crate::domain::resource::task_state::TaskStateSensor;
use crate::domain::resource::vm_registry::VmRegistry;

/// Run-scoped state shared by every tick listener. One context belongs to exactly one run.
#[derive(Debug, Default)]
pub struct SimulationContext {
    pub hosts: HostRegistry,
    pub vms: VmRegistry,
    pub cloudlets: CloudletRegistry,
    pub task_states: TaskStateSensor,
    truncated: bool,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the engine to stop once the current instant is processed.
    pub fn truncate(&mut self) {
        if !self.truncated {
            log::info!("Simulation truncated, stopping after the current tick.");
        }
        self.truncated = true;
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}
