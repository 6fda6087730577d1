use crate::domain::dataset::dataset::HostDescriptor;
use crate::domain::resource::power_model::PowerModel;
use crate::domain::resource::provisioner::ResourceProvisioner;
use crate::domain::resource::registry::Identifiable;
use crate::domain::utils::id::{HostId, HostTag, VmId};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilizationSample {
    pub host_id: HostId,
    pub time: f64,
    pub cpu_utilization: f64,
    pub power_watt: f64,
}

/// Host with swappable provisioning strategies and power model, plus its utilization history.
#[derive(Debug)]
pub struct MonitoredHost {
    pub descriptor: HostDescriptor,
    ram_provisioner: Box<dyn ResourceProvisioner>,
    bw_provisioner: Box<dyn ResourceProvisioner>,
    storage_provisioner: Box<dyn ResourceProvisioner>,
    mips_provisioner: Box<dyn ResourceProvisioner>,
    power_model: Box<dyn PowerModel>,
    utilization_history: Vec<UtilizationSample>,
}

pub struct MonitoredHostBuilder {
    descriptor: HostDescriptor,
    ram_provisioner: Option<Box<dyn ResourceProvisioner>>,
    bw_provisioner: Option<Box<dyn ResourceProvisioner>>,
    storage_provisioner: Option<Box<dyn ResourceProvisioner>>,
    mips_provisioner: Option<Box<dyn ResourceProvisioner>>,
    power_model: Option<Box<dyn PowerModel>>,
}

impl MonitoredHostBuilder {
    pub fn ram_provisioner(mut self, provisioner: Box<dyn ResourceProvisioner>) -> Self {
        self.ram_provisioner = Some(provisioner);
        self
    }

    pub fn bw_provisioner(mut self, provisioner: Box<dyn ResourceProvisioner>) -> Self {
        self.bw_provisioner = Some(provisioner);
        self
    }

    pub fn storage_provisioner(mut self, provisioner: Box<dyn ResourceProvisioner>) -> Self {
        self.storage_provisioner = Some(provisioner);
        self
    }

    pub fn mips_provisioner(mut self, provisioner: Box<dyn ResourceProvisioner>) -> Self {
        self.mips_provisioner = Some(provisioner);
        self
    }

    pub fn power_model(mut self, power_model: Box<dyn PowerModel>) -> Self {
        self.power_model = Some(power_model);
        self
    }

    pub fn build(self) -> Result<MonitoredHost> {
        Ok(MonitoredHost {
            descriptor: self.descriptor,
            ram_provisioner: self.ram_provisioner.ok_or(Error::MissingParameter("ram_provisioner"))?,
            bw_provisioner: self.bw_provisioner.ok_or(Error::MissingParameter("bw_provisioner"))?,
            storage_provisioner: self.storage_provisioner.ok_or(Error::MissingParameter("storage_provisioner"))?,
            mips_provisioner: self.mips_provisioner.ok_or(Error::MissingParameter("mips_provisioner"))?,
            power_model: self.power_model.ok_or(Error::MissingParameter("power_model"))?,
            utilization_history: Vec::new(),
        })
    }
}

impl MonitoredHost {
    pub fn builder(descriptor: HostDescriptor) -> MonitoredHostBuilder {
        MonitoredHostBuilder {
            descriptor,
            ram_provisioner: None,
            bw_provisioner: None,
            storage_provisioner: None,
            mips_provisioner: None,
            power_model: None,
        }
    }

    pub fn mips(&self) -> u64 {
        self.descriptor.cpu_speed_mips
    }

    pub fn power(&self, utilization: f64) -> f64 {
        self.power_model.power(utilization)
    }

    /// Reserves memory, bandwidth, storage and MIPS for a VM. Nothing is kept if any of them fails.
    pub fn provision_vm(&mut self, vm_id: VmId, memory_mb: u64, bandwidth_mbps: u64, disk_mb: u64, mips: u64) -> Result<()> {
        let host_id = self.descriptor.id.value();
        let failed = |resource| Error::ProvisioningFailed { vm_id: vm_id.value(), host_id, resource };

        if !self.ram_provisioner.allocate(vm_id, memory_mb) {
            return Err(failed("memory"));
        }
        if !self.bw_provisioner.allocate(vm_id, bandwidth_mbps) {
            self.ram_provisioner.deallocate(vm_id);
            return Err(failed("bandwidth"));
        }
        if !self.storage_provisioner.allocate(vm_id, disk_mb) {
            self.ram_provisioner.deallocate(vm_id);
            self.bw_provisioner.deallocate(vm_id);
            return Err(failed("storage"));
        }
        if !self.mips_provisioner.allocate(vm_id, mips) {
            self.ram_provisioner.deallocate(vm_id);
            self.bw_provisioner.deallocate(vm_id);
            self.storage_provisioner.deallocate(vm_id);
            return Err(failed("mips"));
        }
        Ok(())
    }

    pub fn allocated_memory_mb(&self) -> u64 {
        self.ram_provisioner.allocated()
    }

    pub(crate) fn record_utilization(&mut self, time: f64, cpu_utilization: f64) -> UtilizationSample {
        let cpu_utilization = cpu_utilization.clamp(0.0, 1.0);
        let sample = UtilizationSample { host_id: self.descriptor.id, time, cpu_utilization, power_watt: self.power(cpu_utilization) };
        self.utilization_history.push(sample);
        sample
    }

    pub fn utilization_history(&self) -> &[UtilizationSample] {
        &self.utilization_history
    }

    /// Mean of the recorded CPU utilization samples, 0 without samples.
    pub fn average_utilization(&self) -> f64 {
        if self.utilization_history.is_empty() {
            return 0.0;
        }
        self.utilization_history.iter().map(|s| s.cpu_utilization).sum::<f64>() / self.utilization_history.len() as f64
    }

    /// Energy in joule up to `until`: each sample's power holds until the next sample, the last
    /// one until `until`.
    pub fn energy_consumption(&self, until: f64) -> f64 {
        let between: f64 = self.utilization_history.windows(2).map(|pair| pair[0].power_watt * (pair[1].time - pair[0].time)).sum();
        let tail = self.utilization_history.last().map_or(0.0, |last| last.power_watt * (until - last.time).max(0.0));
        between + tail
    }
}

impl Identifiable for MonitoredHost {
    type Tag = HostTag;
    const KIND: &'static str = "host";

    fn id(&self) -> HostId {
        self.descriptor.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::power_model::LinearPowerModel;
    use crate::domain::resource::provisioner::SimpleProvisioner;

    fn host() -> MonitoredHost {
        let descriptor = HostDescriptor {
            id: HostId::new(0),
            cores: 2,
            cpu_speed_mips: 2000,
            memory_mb: 4096,
            disk_mb: 10_000,
            bandwidth_mbps: 1000,
            power_idle_watt: 100.0,
            power_peak_watt: 200.0,
        };
        MonitoredHost::builder(descriptor.clone())
            .ram_provisioner(Box::new(SimpleProvisioner::new(descriptor.memory_mb)))
            .bw_provisioner(Box::new(SimpleProvisioner::new(descriptor.bandwidth_mbps)))
            .storage_provisioner(Box::new(SimpleProvisioner::new(descriptor.disk_mb)))
            .mips_provisioner(Box::new(SimpleProvisioner::new(descriptor.cpu_speed_mips)))
            .power_model(Box::new(LinearPowerModel::new(descriptor.power_idle_watt, descriptor.power_peak_watt)))
            .build()
            .unwrap()
    }

    #[test]
    fn builder_without_power_model_fails_immediately() {
        let descriptor = host().descriptor;
        let result = MonitoredHost::builder(descriptor.clone())
            .ram_provisioner(Box::new(SimpleProvisioner::new(1)))
            .bw_provisioner(Box::new(SimpleProvisioner::new(1)))
            .storage_provisioner(Box::new(SimpleProvisioner::new(1)))
            .mips_provisioner(Box::new(SimpleProvisioner::new(1)))
            .build();
        assert!(matches!(result, Err(Error::MissingParameter("power_model"))));
    }

    #[test]
    fn failed_provisioning_rolls_back() {
        let mut host = host();
        let result = host.provision_vm(VmId::new(0), 1024, 100, 1000, 5000);
        assert!(matches!(result, Err(Error::ProvisioningFailed { resource: "mips", .. })));
        assert_eq!(host.allocated_memory_mb(), 0);

        host.provision_vm(VmId::new(0), 1024, 100, 1000, 1000).unwrap();
        assert_eq!(host.allocated_memory_mb(), 1024);
    }

    #[test]
    fn energy_integrates_power_between_samples() {
        let mut host = host();
        host.record_utilization(0.0, 0.0);
        host.record_utilization(5.0, 1.0);
        host.record_utilization(10.0, 0.5);

        assert_eq!(host.energy_consumption(10.0), 100.0 * 5.0 + 200.0 * 5.0);
        assert_eq!(host.energy_consumption(12.0), 100.0 * 5.0 + 200.0 * 5.0 + 150.0 * 2.0);
        assert_eq!(host.average_utilization(), 0.5);
        assert_eq!(host.utilization_history().len(), 3);
    }
}
