use crate::domain::resource::cloudlet_registry::CloudletRegistry;
use crate::domain::resource::host::{MonitoredHost, UtilizationSample};
use crate::domain::resource::registry::Registry;
use crate::domain::resource::vm_registry::VmRegistry;
use crate::domain::utils::id::HostId;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct HostRegistry {
    hosts: Registry<MonitoredHost>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_new_hosts(&mut self, hosts: Vec<MonitoredHost>) -> Result<()> {
        for host in hosts {
            self.hosts.register(host)?;
        }
        Ok(())
    }

    pub fn lookup(&self, id: HostId) -> Result<&MonitoredHost> {
        self.hosts.lookup(id)
    }

    pub fn lookup_mut(&mut self, id: HostId) -> Result<&mut MonitoredHost> {
        self.hosts.lookup_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonitoredHost> {
        self.hosts.values()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Takes one utilization sample per host at `time`.
    ///
    /// A VM contributes its MIPS scaled by the share of its cores that are busy; the host
    /// utilization is that demand over the host capacity, capped at 1.
    pub fn update_utilization_of_hosts(&mut self, time: f64, vms: &VmRegistry, cloudlets: &CloudletRegistry) -> Vec<UtilizationSample> {
        let mut samples = Vec::with_capacity(self.hosts.len());

        for host in self.hosts.values_mut() {
            let host_id = host.descriptor.id;
            let demand: f64 = vms
                .vms_on_host(host_id)
                .map(|vm| {
                    let cores = vm.descriptor.cores.max(1) as usize;
                    let busy = cloudlets.running_on_vm(vm.descriptor.id).min(cores);
                    vm.mips() as f64 * busy as f64 / cores as f64
                })
                .sum();

            let utilization = if host.mips() == 0 { 0.0 } else { (demand / host.mips() as f64).min(1.0) };
            samples.push(host.record_utilization(time, utilization));
        }

        samples
    }

    /// Mean over hosts of their average sampled utilization.
    pub fn average_utilization(&self) -> f64 {
        if self.hosts.is_empty() {
            return 0.0;
        }
        self.hosts.values().map(MonitoredHost::average_utilization).sum::<f64>() / self.hosts.len() as f64
    }

    /// Energy of all hosts in joule, integrated up to `until`.
    pub fn total_energy_consumption(&self, until: f64) -> f64 {
        self.hosts.values().map(|host| host.energy_consumption(until)).sum()
    }
}
