use crate::domain::dataset::dataset::VmDescriptor;
use crate::domain::resource::cloudlet_scheduler::new_cloudlet_scheduler;
use crate::domain::resource::host_registry::HostRegistry;
use crate::domain::resource::vm::Vm;
use crate::domain::resource::vm_registry::VmRegistry;
use crate::domain::utils::id::VmId;
use crate::error::Result;

/// Places VMs on their hosts and registers them.
#[derive(Debug, Default)]
pub struct VmFactory;

impl VmFactory {
    pub fn new() -> Self {
        Self
    }

    /// Provisions the VM on its host. Unknown host or missing capacity is an error.
    pub fn create_vm(&self, descriptor: &VmDescriptor, hosts: &mut HostRegistry) -> Result<Vm> {
        let host = hosts.lookup_mut(descriptor.host_id)?;
        host.provision_vm(descriptor.id, descriptor.memory_mb, descriptor.bandwidth_mbps, descriptor.disk_mb, descriptor.cpu_speed_mips)?;

        let vm = Vm::new(descriptor.clone(), new_cloudlet_scheduler(descriptor.cloudlet_scheduler));
        log::debug!(
            "VM {} ({}, {} MIPS, {:?}) placed on host {}.",
            descriptor.id,
            descriptor.vmm,
            descriptor.cpu_speed_mips,
            vm.scheduler().kind(),
            descriptor.host_id
        );
        Ok(vm)
    }

    pub fn create_vms(&self, descriptors: &[VmDescriptor], hosts: &mut HostRegistry, registry: &mut VmRegistry) -> Result<Vec<VmId>> {
        let vms = descriptors.iter().map(|descriptor| self.create_vm(descriptor, hosts)).collect::<Result<Vec<_>>>()?;
        let ids = descriptors.iter().map(|descriptor| descriptor.id).collect();
        registry.register_new_vms(vms)?;

        log::info!("Created {} VMs.", descriptors.len());
        Ok(ids)
    }
}
