mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use cloud_workflow_sim::api::policy_dto::ActionDto;
use cloud_workflow_sim::api::solution_dto::SolutionDto;
use cloud_workflow_sim::bridge::channel::AgentResult;
use cloud_workflow_sim::bridge::tcp_bridge::PolicyChannel;
use cloud_workflow_sim::domain::scheduler::algorithm_type::PolicyType;
use cloud_workflow_sim::domain::scheduler::gym_policy::GymSchedulingPolicy;
use cloud_workflow_sim::domain::scheduler::policy::SchedulingPolicy;
use cloud_workflow_sim::domain::scheduler::release_mode::ReleaseMode;
use cloud_workflow_sim::domain::simulator::world::SimulatedWorld;
use cloud_workflow_sim::error::{Error, Result};
use common::*;

const LIVENESS: Duration = Duration::from_secs(5);

fn try_run_gym(policy: Rc<RefCell<GymSchedulingPolicy>>, duration: f64) -> Result<SolutionDto> {
    let policy: Rc<RefCell<dyn SchedulingPolicy>> = policy;
    SimulatedWorld::builder()
        .config(config(duration, PolicyType::Gym, ReleaseMode::Immediate))
        .dataset(three_task_dataset())
        .policy(policy)
        .build()?
        .run()
}

fn run_gym(policy: Rc<RefCell<GymSchedulingPolicy>>, duration: f64) -> SolutionDto {
    try_run_gym(policy, duration).unwrap()
}

/// Agent answering every observation with `action`. Reports how many observations it saw once
/// the channel is shut down.
fn spawn_fixed_agent(channel: &PolicyChannel, action: ActionDto) -> mpsc::Receiver<usize> {
    let agent = channel.clone();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut observations = 0;
        while let AgentResult::Continue(_) = agent.consume_observation() {
            observations += 1;
            if agent.publish_action(action.clone()).is_err() {
                break;
            }
        }
        tx.send(observations).unwrap();
    });
    rx
}

#[test]
fn agent_decisions_drive_the_schedule() {
    let channel = PolicyChannel::new();
    let agent = channel.clone();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut decisions = 0;
        while let AgentResult::Continue(observation) = agent.consume_observation() {
            decisions += 1;
            if agent.publish_action(first_ready_on(&observation, 1)).is_err() {
                break;
            }
        }
        tx.send(decisions).unwrap();
    });

    let policy = Rc::new(RefCell::new(GymSchedulingPolicy::new(channel.clone(), ReleaseMode::Immediate)));
    let solution = run_gym(policy.clone(), 10.0);
    channel.shutdown();

    assert_eq!(rx.recv_timeout(LIVENESS).expect("agent did not see the shutdown"), 3);
    assert_eq!(policy.borrow().decisions(), 3);
    assert!(solution.vm_assignments.iter().all(|a| a.vm_id == 1));
    assert_eq!(solution.summary.completed_tasks, 3);
    assert_eq!(solution.summary.total_makespan, 2.0);
    assert!(!solution.summary.truncated);
}

#[test]
fn proceed_leaves_tasks_for_the_next_tick() {
    let channel = PolicyChannel::new();
    let agent = channel.clone();

    thread::spawn(move || {
        while let AgentResult::Continue(observation) = agent.consume_observation() {
            let action = if observation.time < 2.0 { ActionDto::Proceed } else { first_ready_on(&observation, 0) };
            if agent.publish_action(action).is_err() {
                break;
            }
        }
    });

    let policy = Rc::new(RefCell::new(GymSchedulingPolicy::new(channel.clone(), ReleaseMode::Immediate)));
    let solution = run_gym(policy, 10.0);
    channel.shutdown();

    assert!(solution.vm_assignments.iter().all(|a| a.start_time == 2.0));
}

#[test]
fn shutdown_from_the_agent_side_truncates_the_run() {
    let channel = PolicyChannel::new();
    let agent = channel.clone();

    thread::spawn(move || {
        if let AgentResult::Continue(observation) = agent.consume_observation() {
            agent.publish_action(first_ready_on(&observation, 0)).unwrap();
        }
        if let AgentResult::Continue(_) = agent.consume_observation() {
            agent.shutdown();
        }
    });

    let policy = Rc::new(RefCell::new(GymSchedulingPolicy::new(channel.clone(), ReleaseMode::Immediate)));
    let solution = run_gym(policy.clone(), 100.0);

    assert!(solution.summary.truncated);
    assert_eq!(solution.summary.end_time, 0.0);
    assert!(policy.borrow().is_terminated());
    assert_eq!(policy.borrow().decisions(), 1);
}

#[test]
fn run_without_agent_ends_on_shutdown() {
    let channel = PolicyChannel::new();
    let simulation_channel = channel.clone();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let policy = Rc::new(RefCell::new(GymSchedulingPolicy::new(simulation_channel, ReleaseMode::Immediate)));
        tx.send(run_gym(policy, 100.0)).unwrap();
    });

    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    channel.shutdown();

    let solution = rx.recv_timeout(LIVENESS).expect("simulation still blocked after shutdown");
    assert!(solution.summary.truncated);
    assert!(solution.vm_assignments.is_empty());
}

#[test]
fn assignment_to_an_unknown_vm_aborts_the_run() {
    let channel = PolicyChannel::new();
    let agent = spawn_fixed_agent(&channel, ActionDto::Assign { workflow_id: 0, task_id: 0, vm_id: 99 });

    let policy = Rc::new(RefCell::new(GymSchedulingPolicy::new(channel.clone(), ReleaseMode::Immediate)));
    let result = try_run_gym(policy.clone(), 10.0);

    assert!(matches!(result, Err(Error::InvalidAction(_))));
    assert_eq!(policy.borrow().decisions(), 1);

    channel.shutdown();
    assert_eq!(agent.recv_timeout(LIVENESS).expect("agent still blocked after shutdown"), 1);
}

#[test]
fn assignment_of_an_unreleased_task_aborts_the_run() {
    let channel = PolicyChannel::new();
    let agent = spawn_fixed_agent(&channel, ActionDto::Assign { workflow_id: 0, task_id: 42, vm_id: 0 });

    let policy = Rc::new(RefCell::new(GymSchedulingPolicy::new(channel.clone(), ReleaseMode::Immediate)));
    let result = try_run_gym(policy, 10.0);

    assert!(matches!(result, Err(Error::InvalidAction(_))));
    channel.shutdown();
    assert!(channel.is_shutdown());
    assert_eq!(agent.recv_timeout(LIVENESS).expect("agent still blocked after shutdown"), 1);
}
