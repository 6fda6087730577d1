#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use cloud_workflow_sim::api::dataset_dto::{CloudletSchedulerDto, DatasetDto, HostDto, TaskDto, VmDto, WorkflowDto};
use cloud_workflow_sim::api::policy_dto::{ActionDto, ObservationDto, TaskStateDto};
use cloud_workflow_sim::api::solution_dto::SolutionDto;
use cloud_workflow_sim::config::SimulatedWorldConfig;
use cloud_workflow_sim::domain::dataset::dataset::Dataset;
use cloud_workflow_sim::domain::scheduler::algorithm_type::{AlgorithmType, PolicyType};
use cloud_workflow_sim::domain::scheduler::policy::SchedulingPolicy;
use cloud_workflow_sim::domain::scheduler::release_mode::ReleaseMode;
use cloud_workflow_sim::domain::scheduler::static_policy::StaticSchedulingPolicy;
use cloud_workflow_sim::domain::simulator::world::SimulatedWorld;

pub fn host(id: u32, cores: u32, cpu_speed_mips: u64) -> HostDto {
    HostDto {
        id,
        cores,
        cpu_speed_mips,
        memory_mb: 16_384,
        disk_mb: 1_000_000,
        bandwidth_mbps: 10_000,
        power_idle_watt: 100.0,
        power_peak_watt: 250.0,
    }
}

pub fn vm(id: u32, host_id: u32, cpu_speed_mips: u64, memory_mb: u64) -> VmDto {
    VmDto {
        id,
        host_id,
        cores: 1,
        cpu_speed_mips,
        memory_mb,
        disk_mb: 10_000,
        bandwidth_mbps: 100,
        vmm: "Xen".to_string(),
        cloudlet_scheduler: CloudletSchedulerDto::TimeSharedFixed,
    }
}

pub fn task(workflow_id: u32, id: u32, length: u64, child_ids: Vec<u32>) -> TaskDto {
    TaskDto { id, workflow_id, length, req_memory_mb: 512, child_ids }
}

pub fn workflow(id: u32, arrival_time: u32, tasks: Vec<TaskDto>) -> WorkflowDto {
    WorkflowDto { id, arrival_time, tasks }
}

pub fn dataset(workflows: Vec<WorkflowDto>, vms: Vec<VmDto>, hosts: Vec<HostDto>) -> Dataset {
    Dataset::from_dto(DatasetDto { workflows, vms, hosts }).expect("fixture dataset must be valid")
}

/// Two 100 MIPS VMs on one host.
pub fn two_vm_cluster() -> (Vec<VmDto>, Vec<HostDto>) {
    (vec![vm(0, 0, 100, 2048), vm(1, 0, 100, 2048)], vec![host(0, 2, 200)])
}

/// One workflow at t=0 with independent tasks of length 100, 200 and 50.
pub fn three_task_dataset() -> Dataset {
    let (vms, hosts) = two_vm_cluster();
    let tasks = vec![task(0, 0, 100, vec![]), task(0, 1, 200, vec![]), task(0, 2, 50, vec![])];
    dataset(vec![workflow(0, 0, tasks)], vms, hosts)
}

pub fn config(duration: f64, policy: PolicyType, release_mode: ReleaseMode) -> SimulatedWorldConfig {
    SimulatedWorldConfig { duration, policy, release_mode, ..Default::default() }
}

pub fn run_static(dataset: Dataset, algorithm: AlgorithmType, release_mode: ReleaseMode, duration: f64) -> SolutionDto {
    let policy: Rc<RefCell<dyn SchedulingPolicy>> = Rc::new(RefCell::new(StaticSchedulingPolicy::new(algorithm.get_instance(7), release_mode)));
    SimulatedWorld::builder()
        .config(config(duration, PolicyType::Static(algorithm), release_mode))
        .dataset(dataset)
        .policy(policy)
        .build()
        .expect("world must build")
        .run()
        .expect("run must succeed")
}

/// Finish time of `(workflow, task)` in the solution.
pub fn finish_time(solution: &SolutionDto, workflow_id: u32, task_id: u32) -> Option<f64> {
    solution.vm_assignments.iter().find(|a| a.workflow_id == workflow_id && a.task_id == task_id).map(|a| a.end_time)
}

/// Decision an agent takes for an observation: first ready task on `vm_id`, or proceed.
pub fn first_ready_on(observation: &ObservationDto, vm_id: u32) -> ActionDto {
    observation
        .tasks
        .iter()
        .find(|task| task.state == TaskStateDto::Ready)
        .map(|task| ActionDto::Assign { workflow_id: task.workflow_id, task_id: task.task_id, vm_id })
        .unwrap_or(ActionDto::Proceed)
}
