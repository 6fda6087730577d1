use std::collections::{HashMap, HashSet, VecDeque};

use crate::api::dataset_dto::{DatasetDto, HostDto, VmDto, WorkflowDto};
use crate::error::{Error, Result};

/// Checks the structural soundness of a dataset document.
pub fn validate(dto: &DatasetDto) -> Result<()> {
    validate_hosts(&dto.hosts)?;
    validate_vms(&dto.vms, &dto.hosts)?;

    let max_vm_memory = dto.vms.iter().map(|vm| vm.memory_mb).max().unwrap_or(0);

    let mut workflow_ids = HashSet::new();
    for workflow in &dto.workflows {
        if !workflow_ids.insert(workflow.id) {
            return Err(invalid(format!("workflow id {} appears more than once", workflow.id)));
        }
        validate_workflow(workflow, max_vm_memory)?;
    }

    Ok(())
}

fn invalid(message: String) -> Error {
    Error::InvalidDataset(message)
}

fn validate_hosts(hosts: &[HostDto]) -> Result<()> {
    let mut ids = HashSet::new();
    for host in hosts {
        if !ids.insert(host.id) {
            return Err(invalid(format!("host id {} appears more than once", host.id)));
        }
        if host.cores == 0 || host.cpu_speed_mips == 0 {
            return Err(invalid(format!("host {} needs at least one core and a positive cpu speed", host.id)));
        }
        if host.power_idle_watt < 0.0 || host.power_idle_watt > host.power_peak_watt {
            return Err(invalid(format!(
                "host {} has idle power {} W above peak power {} W",
                host.id, host.power_idle_watt, host.power_peak_watt
            )));
        }
    }
    Ok(())
}

fn validate_vms(vms: &[VmDto], hosts: &[HostDto]) -> Result<()> {
    if vms.is_empty() {
        return Err(invalid("dataset contains no VMs".to_string()));
    }

    let host_ids: HashSet<u32> = hosts.iter().map(|host| host.id).collect();
    let mut ids = HashSet::new();
    let mut demand: HashMap<u32, HostDemand> = HashMap::new();
    for vm in vms {
        if !ids.insert(vm.id) {
            return Err(invalid(format!("vm id {} appears more than once", vm.id)));
        }
        if !host_ids.contains(&vm.host_id) {
            return Err(invalid(format!("vm {} references unknown host {}", vm.id, vm.host_id)));
        }
        if vm.cores == 0 || vm.cpu_speed_mips == 0 {
            return Err(invalid(format!("vm {} needs at least one core and a positive cpu speed", vm.id)));
        }
        demand.entry(vm.host_id).or_default().add(vm);
    }

    for host in hosts {
        let Some(demand) = demand.get(&host.id) else {
            continue;
        };
        let capacity = [
            ("memory", demand.memory_mb, host.memory_mb),
            ("bandwidth", demand.bandwidth_mbps, host.bandwidth_mbps),
            ("storage", demand.disk_mb, host.disk_mb),
            ("mips", demand.mips, host.cpu_speed_mips),
        ];
        if let Some((resource, needed, available)) = capacity.into_iter().find(|(_, needed, available)| needed > available) {
            return Err(invalid(format!("vms on host {} need {} {} but the host offers {}", host.id, needed, resource, available)));
        }
    }
    Ok(())
}

/// Summed resource demand of the VMs placed on one host.
#[derive(Debug, Default)]
struct HostDemand {
    memory_mb: u64,
    bandwidth_mbps: u64,
    disk_mb: u64,
    mips: u64,
}

impl HostDemand {
    fn add(&mut self, vm: &VmDto) {
        self.memory_mb = self.memory_mb.saturating_add(vm.memory_mb);
        self.bandwidth_mbps = self.bandwidth_mbps.saturating_add(vm.bandwidth_mbps);
        self.disk_mb = self.disk_mb.saturating_add(vm.disk_mb);
        self.mips = self.mips.saturating_add(vm.cpu_speed_mips);
    }
}

fn validate_workflow(workflow: &WorkflowDto, max_vm_memory: u64) -> Result<()> {
    let mut task_ids = HashSet::new();
    for task in &workflow.tasks {
        if !task_ids.insert(task.id) {
            return Err(invalid(format!("task id {} appears more than once in workflow {}", task.id, workflow.id)));
        }
        if task.workflow_id != workflow.id {
            return Err(invalid(format!("task {} claims workflow {} but is listed in workflow {}", task.id, task.workflow_id, workflow.id)));
        }
        if task.length == 0 {
            return Err(invalid(format!("task {} of workflow {} has zero length", task.id, workflow.id)));
        }
        if task.req_memory_mb > max_vm_memory {
            return Err(invalid(format!(
                "task {} of workflow {} needs {} MB but the largest VM has {} MB",
                task.id, workflow.id, task.req_memory_mb, max_vm_memory
            )));
        }
    }

    for task in &workflow.tasks {
        for child_id in &task.child_ids {
            if *child_id == task.id {
                return Err(invalid(format!("task {} of workflow {} depends on itself", task.id, workflow.id)));
            }
            if !task_ids.contains(child_id) {
                return Err(invalid(format!("task {} of workflow {} has unknown child {}", task.id, workflow.id, child_id)));
            }
        }
    }

    if has_cycle(workflow) {
        return Err(invalid(format!("dependencies of workflow {} contain a cycle", workflow.id)));
    }

    Ok(())
}

/// Kahn's algorithm: a DAG drains completely.
fn has_cycle(workflow: &WorkflowDto) -> bool {
    let mut in_degree: HashMap<u32, usize> = workflow.tasks.iter().map(|task| (task.id, 0)).collect();
    for task in &workflow.tasks {
        let children: HashSet<u32> = task.child_ids.iter().copied().collect();
        for child in children {
            *in_degree.entry(child).or_default() += 1;
        }
    }

    let children_of: HashMap<u32, HashSet<u32>> = workflow.tasks.iter().map(|task| (task.id, task.child_ids.iter().copied().collect())).collect();

    let mut queue: VecDeque<u32> = in_degree.iter().filter(|(_, degree)| **degree == 0).map(|(id, _)| *id).collect();
    let mut visited = 0;

    while let Some(id) = queue.pop_front() {
        visited += 1;
        if let Some(children) = children_of.get(&id) {
            for child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*child);
                    }
                }
            }
        }
    }

    visited != workflow.tasks.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dataset_dto::{CloudletSchedulerDto, TaskDto};

    fn host(id: u32) -> HostDto {
        HostDto {
            id,
            cores: 4,
            cpu_speed_mips: 4000,
            memory_mb: 8192,
            disk_mb: 100_000,
            bandwidth_mbps: 1000,
            power_idle_watt: 80.0,
            power_peak_watt: 200.0,
        }
    }

    fn vm(id: u32, host_id: u32) -> VmDto {
        VmDto {
            id,
            host_id,
            cores: 1,
            cpu_speed_mips: 1000,
            memory_mb: 1024,
            disk_mb: 1000,
            bandwidth_mbps: 100,
            vmm: "Xen".to_string(),
            cloudlet_scheduler: CloudletSchedulerDto::TimeSharedFixed,
        }
    }

    fn task(workflow_id: u32, id: u32, child_ids: Vec<u32>) -> TaskDto {
        TaskDto { id, workflow_id, length: 100, req_memory_mb: 128, child_ids }
    }

    fn dataset(tasks: Vec<TaskDto>) -> DatasetDto {
        DatasetDto { workflows: vec![WorkflowDto { id: 0, arrival_time: 0, tasks }], vms: vec![vm(0, 0)], hosts: vec![host(0)] }
    }

    #[test]
    fn accepts_a_diamond() {
        let dto = dataset(vec![task(0, 0, vec![1, 2]), task(0, 1, vec![3]), task(0, 2, vec![3]), task(0, 3, vec![])]);
        assert!(validate(&dto).is_ok());
    }

    #[test]
    fn rejects_cycles_and_self_loops() {
        let cycle = dataset(vec![task(0, 0, vec![1]), task(0, 1, vec![2]), task(0, 2, vec![0])]);
        assert!(matches!(validate(&cycle), Err(Error::InvalidDataset(msg)) if msg.contains("cycle")));

        let self_loop = dataset(vec![task(0, 0, vec![0])]);
        assert!(matches!(validate(&self_loop), Err(Error::InvalidDataset(msg)) if msg.contains("itself")));
    }

    #[test]
    fn rejects_unknown_children_and_duplicate_tasks() {
        let unknown_child = dataset(vec![task(0, 0, vec![9])]);
        assert!(validate(&unknown_child).is_err());

        let duplicate = dataset(vec![task(0, 0, vec![]), task(0, 0, vec![])]);
        assert!(validate(&duplicate).is_err());
    }

    #[test]
    fn rejects_vm_on_unknown_host() {
        let mut dto = dataset(vec![task(0, 0, vec![])]);
        dto.vms.push(vm(1, 42));
        assert!(matches!(validate(&dto), Err(Error::InvalidDataset(msg)) if msg.contains("unknown host")));
    }

    #[test]
    fn rejects_vms_that_oversubscribe_their_host() {
        let mut dto = dataset(vec![task(0, 0, vec![])]);
        dto.vms[0].cpu_speed_mips = 5000;
        assert!(matches!(validate(&dto), Err(Error::InvalidDataset(msg)) if msg.contains("mips")));

        let mut dto = dataset(vec![task(0, 0, vec![])]);
        dto.vms.extend((1..8).map(|id| vm(id, 0)));
        dto.vms[7].memory_mb = 2048;
        assert!(matches!(validate(&dto), Err(Error::InvalidDataset(msg)) if msg.contains("memory")));
    }

    #[test]
    fn accepts_vms_that_exactly_fill_their_host() {
        let mut dto = dataset(vec![task(0, 0, vec![])]);
        dto.vms.extend((1..4).map(|id| vm(id, 0)));
        assert!(validate(&dto).is_ok());
    }

    #[test]
    fn rejects_tasks_no_vm_can_hold() {
        let mut dto = dataset(vec![task(0, 0, vec![])]);
        dto.workflows[0].tasks[0].req_memory_mb = 4096;
        assert!(validate(&dto).is_err());
    }

    #[test]
    fn rejects_empty_cluster() {
        let mut dto = dataset(vec![task(0, 0, vec![])]);
        dto.vms.clear();
        assert!(validate(&dto).is_err());
    }
}
