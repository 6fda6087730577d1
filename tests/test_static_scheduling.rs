mod common;

use cloud_workflow_sim::domain::scheduler::algorithm_type::AlgorithmType;
use cloud_workflow_sim::domain::scheduler::release_mode::ReleaseMode;
use cloud_workflow_sim::error::Error;
use common::*;
use tracing_test::traced_test;

#[test]
fn round_robin_runs_three_independent_tasks_in_parallel() {
    let solution = run_static(three_task_dataset(), AlgorithmType::RoundRobin, ReleaseMode::Immediate, 10.0);

    assert_eq!(solution.vm_assignments.len(), 3);
    assert_eq!(finish_time(&solution, 0, 0), Some(1.0));
    assert_eq!(finish_time(&solution, 0, 1), Some(2.0));
    assert_eq!(finish_time(&solution, 0, 2), Some(0.5));

    let vms: Vec<u32> = solution.vm_assignments.iter().map(|a| a.vm_id).collect();
    assert_eq!(vms, vec![0, 1, 0]);

    assert_eq!(solution.summary.total_tasks, 3);
    assert_eq!(solution.summary.completed_tasks, 3);
    assert_eq!(solution.summary.total_makespan, 2.0);
    assert_eq!(solution.summary.last_finish_time, 2.0);
    assert!(!solution.summary.truncated);
}

#[test]
fn children_start_when_their_parent_finishes() {
    let (vms, hosts) = two_vm_cluster();
    let tasks = vec![task(0, 0, 100, vec![1, 2]), task(0, 1, 100, vec![3]), task(0, 2, 300, vec![3]), task(0, 3, 50, vec![])];
    let solution = run_static(dataset(vec![workflow(0, 0, tasks)], vms, hosts), AlgorithmType::EarliestFinish, ReleaseMode::Immediate, 20.0);

    let start_of = |task_id| solution.vm_assignments.iter().find(|a| a.task_id == task_id).map(|a| a.start_time);
    assert_eq!(start_of(1), Some(1.0));
    assert_eq!(start_of(2), Some(1.0));
    assert_eq!(start_of(3), Some(4.0));
    assert_eq!(finish_time(&solution, 0, 3), Some(4.5));
    assert_eq!(solution.summary.total_makespan, 4.5);
}

#[test]
fn workflows_are_not_admitted_before_their_arrival() {
    let (vms, hosts) = two_vm_cluster();
    let workflows = vec![workflow(0, 3, vec![task(0, 0, 100, vec![])]), workflow(1, 0, vec![task(1, 0, 100, vec![])])];
    let solution = run_static(dataset(workflows, vms, hosts), AlgorithmType::RoundRobin, ReleaseMode::Immediate, 10.0);

    let late = solution.vm_assignments.iter().find(|a| a.workflow_id == 0).unwrap();
    assert_eq!(late.start_time, 3.0);
    assert_eq!(solution.summary.total_makespan, 2.0);
}

#[test]
fn unfinished_tasks_are_missing_from_the_assignments() {
    let solution = run_static(three_task_dataset(), AlgorithmType::RoundRobin, ReleaseMode::Immediate, 1.0);

    assert_eq!(solution.summary.end_time, 1.0);
    assert_eq!(solution.summary.completed_tasks, 2);
    assert_eq!(finish_time(&solution, 0, 1), None);
}

#[test]
fn release_every_n_ticks_delays_execution() {
    let solution = run_static(three_task_dataset(), AlgorithmType::RoundRobin, ReleaseMode::EveryTicks(3), 20.0);

    // the third tick is t=2
    assert!(solution.vm_assignments.iter().all(|a| a.start_time == 2.0));
    assert_eq!(solution.summary.completed_tasks, 3);
}

#[test]
fn best_fit_prefers_the_tightest_memory() {
    let hosts = vec![host(0, 2, 200)];
    let vms = vec![vm(0, 0, 100, 8192), vm(1, 0, 100, 1024)];
    let solution = run_static(dataset(vec![workflow(0, 0, vec![task(0, 0, 100, vec![])])], vms, hosts), AlgorithmType::BestFit, ReleaseMode::Immediate, 5.0);

    assert_eq!(solution.vm_assignments[0].vm_id, 1);
}

#[test]
fn random_is_reproducible_with_the_same_seed() {
    let first = run_static(three_task_dataset(), AlgorithmType::Random, ReleaseMode::Immediate, 10.0);
    let second = run_static(three_task_dataset(), AlgorithmType::Random, ReleaseMode::Immediate, 10.0);
    assert_eq!(first, second);
    assert_eq!(first.summary.completed_tasks, 3);
}

#[test]
fn host_utilization_and_energy_are_reported() {
    let solution = run_static(three_task_dataset(), AlgorithmType::RoundRobin, ReleaseMode::Immediate, 10.0);

    // only the sample at t=0 sees busy VMs, samples at 5 and 10 are idle
    assert!(solution.summary.average_host_utilization > 0.0);
    assert!(solution.summary.average_host_utilization < 1.0);
    assert!(solution.summary.total_energy_joule >= 100.0 * 10.0);
}

#[test]
fn energy_covers_the_time_after_the_last_sample() {
    let solution = run_static(three_task_dataset(), AlgorithmType::RoundRobin, ReleaseMode::Immediate, 12.0);

    // busy at t=0 (250 W), idle samples at 5 and 10 (100 W), idle tail from 10 to 12
    assert_eq!(solution.summary.end_time, 12.0);
    assert_eq!(solution.summary.total_energy_joule, 250.0 * 5.0 + 100.0 * 5.0 + 100.0 * 2.0);
}

#[test]
fn world_without_policy_does_not_build() {
    let result = cloud_workflow_sim::domain::simulator::world::SimulatedWorld::builder()
        .config(Default::default())
        .dataset(three_task_dataset())
        .build();
    assert!(matches!(result, Err(Error::MissingParameter("policy"))));
}

#[test]
#[traced_test]
fn run_summary_is_emitted_as_analytics_event() {
    run_static(three_task_dataset(), AlgorithmType::RoundRobin, ReleaseMode::Immediate, 5.0);
    assert!(logs_contain("Run summary"));
    assert!(logs_contain("Host sample"));
}
