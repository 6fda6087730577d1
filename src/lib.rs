use std::cell::RefCell;
use std::rc::Rc;

use crate::api::solution_dto::SolutionDto;
use crate::bridge::tcp_bridge::{PolicyChannel, spawn_bridge};
use crate::config::{BridgeConfig, SimulatedWorldConfig};
use crate::domain::dataset::dataset::Dataset;
use crate::domain::scheduler::algorithm_type::PolicyType;
use crate::domain::scheduler::gym_policy::GymSchedulingPolicy;
use crate::domain::scheduler::policy::SchedulingPolicy;
use crate::domain::scheduler::static_policy::StaticSchedulingPolicy;
use crate::domain::simulator::world::SimulatedWorld;
use crate::domain::utils::statistics::StatsCollector;
use crate::error::Result;

pub mod api;
pub mod bridge;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Runs one simulation of `dataset` and returns its report.
///
/// With the gym policy the decision bridge is started first and torn down after the run, waiting
/// at most `bridge_config.join_timeout` for it.
pub fn run_simulation(dataset: Dataset, config: SimulatedWorldConfig, bridge_config: &BridgeConfig) -> Result<SolutionDto> {
    config.validate()?;
    let stats = config.stats_file.as_deref().map(|path| StatsCollector::init(Some(path))).transpose()?;

    match config.policy {
        PolicyType::Static(algorithm) => {
            let policy: Rc<RefCell<dyn SchedulingPolicy>> =
                Rc::new(RefCell::new(StaticSchedulingPolicy::new(algorithm.get_instance(config.seed), config.release_mode)));
            run_world(dataset, config, policy, stats)
        }
        PolicyType::Gym => {
            let channel = PolicyChannel::new();
            let bridge = spawn_bridge(bridge_config, channel.clone())?;
            let policy: Rc<RefCell<dyn SchedulingPolicy>> = Rc::new(RefCell::new(GymSchedulingPolicy::new(channel.clone(), config.release_mode)));

            let result = run_world(dataset, config, policy, stats);

            channel.shutdown();
            if !bridge.join_timeout(bridge_config.join_timeout) {
                log::warn!("Emitting results without a clean bridge shutdown.");
            }
            result
        }
    }
}

fn run_world(dataset: Dataset, config: SimulatedWorldConfig, policy: Rc<RefCell<dyn SchedulingPolicy>>, stats: Option<StatsCollector>) -> Result<SolutionDto> {
    let mut builder = SimulatedWorld::builder().config(config).dataset(dataset).policy(policy);
    if let Some(stats) = stats {
        builder = builder.stats(stats);
    }
    builder.build()?.run()
}
