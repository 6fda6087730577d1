use std::collections::HashMap;
use std::fmt::Debug;

use crate::domain::utils::id::VmId;

/// Hands out a host resource (memory, bandwidth, storage, MIPS) to the VMs placed on it.
pub trait ResourceProvisioner: Debug {
    fn capacity(&self) -> u64;
    fn allocated(&self) -> u64;

    /// Returns false and leaves the state untouched if the amount does not fit.
    fn allocate(&mut self, vm_id: VmId, amount: u64) -> bool;
    fn deallocate(&mut self, vm_id: VmId);

    fn available(&self) -> u64 {
        self.capacity().saturating_sub(self.allocated())
    }
}

/// Strict provisioner: no overcommitment.
#[derive(Debug, Clone)]
pub struct SimpleProvisioner {
    capacity: u64,
    allocations: HashMap<VmId, u64>,
}

impl SimpleProvisioner {
    pub fn new(capacity: u64) -> Self {
        Self { capacity, allocations: HashMap::new() }
    }
}

impl ResourceProvisioner for SimpleProvisioner {
    fn capacity(&self) -> u64 {
        self.capacity
    }

    fn allocated(&self) -> u64 {
        self.allocations.values().sum()
    }

    fn allocate(&mut self, vm_id: VmId, amount: u64) -> bool {
        let previous = self.allocations.get(&vm_id).copied().unwrap_or(0);
        if self.allocated() - previous + amount > self.capacity {
            return false;
        }
        self.allocations.insert(vm_id, amount);
        true
    }

    fn deallocate(&mut self, vm_id: VmId) {
        self.allocations.remove(&vm_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_overcommitment() {
        let mut provisioner = SimpleProvisioner::new(1000);
        assert!(provisioner.allocate(VmId::new(0), 600));
        assert!(!provisioner.allocate(VmId::new(1), 500));
        assert_eq!(provisioner.available(), 400);

        provisioner.deallocate(VmId::new(0));
        assert!(provisioner.allocate(VmId::new(1), 500));
    }

    #[test]
    fn reallocating_replaces_the_previous_amount() {
        let mut provisioner = SimpleProvisioner::new(1000);
        assert!(provisioner.allocate(VmId::new(0), 900));
        assert!(provisioner.allocate(VmId::new(0), 1000));
        assert_eq!(provisioner.allocated(), 1000);
    }
}
