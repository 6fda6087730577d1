use crate::domain::dataset::dataset::HostDescriptor;
use crate::domain::resource::host::MonitoredHost;
use crate::domain::resource::host_registry::HostRegistry;
use crate::domain::resource::power_model::LinearPowerModel;
use crate::domain::resource::provisioner::SimpleProvisioner;
use crate::domain::utils::id::HostId;
use crate::error::Result;

/// Builds monitored hosts from their descriptors and registers them.
#[derive(Debug, Default)]
pub struct HostFactory;

impl HostFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn create_host(&self, descriptor: &HostDescriptor) -> Result<MonitoredHost> {
        MonitoredHost::builder(descriptor.clone())
            .ram_provisioner(Box::new(SimpleProvisioner::new(descriptor.memory_mb)))
            .bw_provisioner(Box::new(SimpleProvisioner::new(descriptor.bandwidth_mbps)))
            .storage_provisioner(Box::new(SimpleProvisioner::new(descriptor.disk_mb)))
            .mips_provisioner(Box::new(SimpleProvisioner::new(descriptor.cpu_speed_mips)))
            .power_model(Box::new(LinearPowerModel::new(descriptor.power_idle_watt, descriptor.power_peak_watt)))
            .build()
    }

    /// Creates the whole batch first; nothing is registered if one host fails.
    pub fn create_hosts(&self, descriptors: &[HostDescriptor], registry: &mut HostRegistry) -> Result<Vec<HostId>> {
        let hosts = descriptors.iter().map(|descriptor| self.create_host(descriptor)).collect::<Result<Vec<_>>>()?;
        let ids = descriptors.iter().map(|descriptor| descriptor.id).collect();
        registry.register_new_hosts(hosts)?;

        log::info!("Created {} hosts.", descriptors.len());
        Ok(ids)
    }
}
