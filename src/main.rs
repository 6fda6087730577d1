use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use cloud_workflow_sim::config::{BridgeConfig, SimulatedWorldConfig};
use cloud_workflow_sim::domain::scheduler::algorithm_type::PolicyType;
use cloud_workflow_sim::domain::scheduler::release_mode::ReleaseMode;
use cloud_workflow_sim::loader::parser::load_dataset;
use cloud_workflow_sim::{logger, run_simulation};

/// Simulates DAG workflows on a VM cluster and prints the resulting schedule as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Dataset JSON file; read from stdin if omitted.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Simulated time at which the run stops.
    #[arg(short, long, default_value_t = 1000.0)]
    duration: f64,

    #[arg(long, default_value_t = 1.0)]
    tick_interval: f64,

    /// Interval between host utilization samples.
    #[arg(long, default_value_t = 5.0)]
    monitoring_interval: f64,

    /// round_robin, best_fit, earliest_finish, random or gym.
    #[arg(short, long, default_value = "round_robin")]
    algorithm: PolicyType,

    /// immediate, every:N (ticks) or pending:K (tasks).
    #[arg(short, long, default_value = "immediate")]
    release_mode: ReleaseMode,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Decision bridge host, used by the gym policy.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value_t = 25333)]
    port: u16,

    /// Seconds to wait for the decision bridge at shutdown.
    #[arg(long, default_value_t = 5)]
    join_timeout: u64,

    /// CSV file for utilization statistics.
    #[arg(long)]
    stats_file: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level.as_deref(), args.log_file.as_deref());

    let dataset = load_dataset(args.file.as_deref()).context("Failed to load dataset")?;

    let config = SimulatedWorldConfig {
        duration: args.duration,
        tick_interval: args.tick_interval,
        monitoring_interval: args.monitoring_interval,
        policy: args.algorithm,
        release_mode: args.release_mode,
        seed: args.seed,
        stats_file: args.stats_file,
    };
    let bridge_config = BridgeConfig { host: args.host, port: args.port, join_timeout: Duration::from_secs(args.join_timeout) };

    let solution = run_simulation(dataset, config, &bridge_config).context("Simulation failed")?;
    println!("{}", solution.to_json()?);

    log::info!(
        "Simulation finished at {}: {}/{} tasks completed, total makespan {:.3}.",
        solution.summary.end_time,
        solution.summary.completed_tasks,
        solution.summary.total_tasks,
        solution.summary.total_makespan
    );
    Ok(())
}
