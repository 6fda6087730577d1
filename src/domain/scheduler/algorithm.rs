use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Debug;

use crate::domain::resource::cloudlet::Cloudlet;
use crate::domain::scheduler::policy::SchedulerState;
use crate::domain::utils::id::VmId;
use crate::error::Result;

/// In-process heuristic choosing a VM for one ready cloudlet.
pub trait SchedulingAlgorithm: Debug {
    fn name(&self) -> &'static str;

    /// Picks one of `candidates`.
    ///
    /// # Arguments
    /// * `cloudlet` - The ready cloudlet to place.
    /// * `candidates` - Suitable VMs in id order, never empty.
    /// * `state` - Registries and time of the current instant.
    fn select_vm(&mut self, cloudlet: &Cloudlet, candidates: &[VmId], state: &SchedulerState<'_>) -> Result<VmId>;
}

/// Cycles over all VMs, skipping the ones that cannot take the cloudlet.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: usize,
}

impl SchedulingAlgorithm for RoundRobin {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn select_vm(&mut self, _cloudlet: &Cloudlet, candidates: &[VmId], state: &SchedulerState<'_>) -> Result<VmId> {
        let all_vms = state.context.vms.ids();
        let count = all_vms.len();

        for offset in 0..count {
            let index = (self.cursor + offset) % count;
            if candidates.contains(&all_vms[index]) {
                self.cursor = (index + 1) % count;
                return Ok(all_vms[index]);
            }
        }

        // candidates are a subset of the registered VMs, so this is only reached with an empty registry
        Ok(candidates[0])
    }
}

/// Smallest memory surplus; ties go to the VM that is free first.
#[derive(Debug, Default)]
pub struct BestFit;

impl SchedulingAlgorithm for BestFit {
    fn name(&self) -> &'static str {
        "best_fit"
    }

    fn select_vm(&mut self, cloudlet: &Cloudlet, candidates: &[VmId], state: &SchedulerState<'_>) -> Result<VmId> {
        let mut best: Option<(u64, f64, VmId)> = None;

        for vm_id in candidates {
            let vm = state.context.vms.lookup(*vm_id)?;
            let surplus = vm.memory_mb() - cloudlet.req_memory_mb;
            let free_at = state.context.cloudlets.estimated_vm_free_at(*vm_id, state.time);

            let better = match best {
                None => true,
                Some((best_surplus, best_free_at, _)) => surplus < best_surplus || (surplus == best_surplus && free_at < best_free_at),
            };
            if better {
                best = Some((surplus, free_at, *vm_id));
            }
        }

        Ok(best.map_or(candidates[0], |(_, _, vm_id)| vm_id))
    }
}

/// Greedy minimum of the estimated completion time.
#[derive(Debug, Default)]
pub struct EarliestFinish;

impl SchedulingAlgorithm for EarliestFinish {
    fn name(&self) -> &'static str {
        "earliest_finish"
    }

    fn select_vm(&mut self, cloudlet: &Cloudlet, candidates: &[VmId], state: &SchedulerState<'_>) -> Result<VmId> {
        let mut best: Option<(f64, VmId)> = None;

        for vm_id in candidates {
            let vm = state.context.vms.lookup(*vm_id)?;
            let finish = state.context.cloudlets.estimated_vm_free_at(*vm_id, state.time) + vm.execution_time(cloudlet.length);
            if best.is_none_or(|(best_finish, _)| finish < best_finish) {
                best = Some((finish, *vm_id));
            }
        }

        Ok(best.map_or(candidates[0], |(_, vm_id)| vm_id))
    }
}

/// Uniform choice among the suitable VMs, reproducible through the seed.
#[derive(Debug)]
pub struct RandomChoice {
    rng: StdRng,
}

impl RandomChoice {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl SchedulingAlgorithm for RandomChoice {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_vm(&mut self, _cloudlet: &Cloudlet, candidates: &[VmId], _state: &SchedulerState<'_>) -> Result<VmId> {
        Ok(candidates[self.rng.random_range(0..candidates.len())])
    }
}
