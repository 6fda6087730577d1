use crate::domain::dataset::dataset::VmDescriptor;
use crate::domain::resource::cloudlet_scheduler::{CloudletScheduler, ExecutionWindow};
use crate::domain::resource::registry::Identifiable;
use crate::domain::utils::id::{HostId, VmId, VmTag};

/// A VM placed on a host, running cloudlets through its scheduler.
#[derive(Debug)]
pub struct Vm {
    pub descriptor: VmDescriptor,
    scheduler: Box<dyn CloudletScheduler>,
}

impl Vm {
    pub fn new(descriptor: VmDescriptor, scheduler: Box<dyn CloudletScheduler>) -> Self {
        Self { descriptor, scheduler }
    }

    pub fn host_id(&self) -> HostId {
        self.descriptor.host_id
    }

    pub fn mips(&self) -> u64 {
        self.descriptor.cpu_speed_mips
    }

    pub fn memory_mb(&self) -> u64 {
        self.descriptor.memory_mb
    }

    pub fn is_suitable_for(&self, req_memory_mb: u64) -> bool {
        self.descriptor.memory_mb >= req_memory_mb
    }

    /// Time the VM needs for `length` work units at full speed.
    pub fn execution_time(&self, length: u64) -> f64 {
        length as f64 / self.mips() as f64
    }

    pub fn scheduler(&self) -> &dyn CloudletScheduler {
        self.scheduler.as_ref()
    }

    pub(crate) fn submit(&mut self, length: u64, now: f64) -> ExecutionWindow {
        let mips = self.mips();
        self.scheduler.submit(length, mips, now)
    }
}

impl Identifiable for Vm {
    type Tag = VmTag;
    const KIND: &'static str = "vm";

    fn id(&self) -> VmId {
        self.descriptor.id
    }
}
