use crate::domain::resource::registry::Registry;
use crate::domain::resource::vm::Vm;
use crate::domain::utils::id::{HostId, VmId};
use crate::error::Result;

#[derive(Debug, Default)]
pub struct VmRegistry {
    vms: Registry<Vm>,
}

impl VmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_new_vms(&mut self, vms: Vec<Vm>) -> Result<()> {
        for vm in vms {
            self.vms.register(vm)?;
        }
        Ok(())
    }

    pub fn lookup(&self, id: VmId) -> Result<&Vm> {
        self.vms.lookup(id)
    }

    pub fn lookup_mut(&mut self, id: VmId) -> Result<&mut Vm> {
        self.vms.lookup_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vm> {
        self.vms.values()
    }

    pub fn ids(&self) -> Vec<VmId> {
        self.vms.ids().collect()
    }

    pub fn vms_on_host(&self, host_id: HostId) -> impl Iterator<Item = &Vm> {
        self.vms.values().filter(move |vm| vm.host_id() == host_id)
    }

    /// VMs with enough memory for a task, in id order.
    pub fn suitable_for(&self, req_memory_mb: u64) -> Vec<VmId> {
        self.vms.values().filter(|vm| vm.is_suitable_for(req_memory_mb)).map(|vm| vm.descriptor.id).collect()
    }

    pub fn len(&self) -> usize {
        self.vms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }
}
