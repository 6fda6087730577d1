use std::cell::RefCell;
use std::rc::Rc;

use crate::api::solution_dto::{SolutionDto, SummaryDto};
use crate::config::SimulatedWorldConfig;
use crate::domain::admission::buffer::WorkflowBuffer;
use crate::domain::admission::coordinator::{LocalWorkflowCoordinator, WorkflowCoordinator};
use crate::domain::admission::submitter::WorkflowSubmitter;
use crate::domain::dataset::dataset::Dataset;
use crate::domain::factory::host_factory::HostFactory;
use crate::domain::factory::vm_factory::VmFactory;
use crate::domain::monitoring::host_monitor::HostMonitor;
use crate::domain::scheduler::policy::SchedulingPolicy;
use crate::domain::scheduler::scheduling_listener::SchedulingListener;
use crate::domain::simulator::context::SimulationContext;
use crate::domain::simulator::tick_engine::TickEngine;
use crate::domain::utils::statistics::{ANALYTICS_TARGET, StatsCollector};
use crate::error::{Error, Result};

/// One fully wired simulation run: the dataset, the active policy and the admission path.
pub struct SimulatedWorld {
    config: SimulatedWorldConfig,
    dataset: Dataset,
    policy: Rc<RefCell<dyn SchedulingPolicy>>,
    coordinator: Box<dyn WorkflowCoordinator>,
    stats: Option<Rc<StatsCollector>>,
}

#[derive(Default)]
pub struct SimulatedWorldBuilder {
    config: Option<SimulatedWorldConfig>,
    dataset: Option<Dataset>,
    policy: Option<Rc<RefCell<dyn SchedulingPolicy>>>,
    coordinator: Option<Box<dyn WorkflowCoordinator>>,
    stats: Option<StatsCollector>,
}

impl SimulatedWorldBuilder {
    pub fn config(mut self, config: SimulatedWorldConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn policy(mut self, policy: Rc<RefCell<dyn SchedulingPolicy>>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Defaults to [`LocalWorkflowCoordinator`].
    pub fn coordinator(mut self, coordinator: Box<dyn WorkflowCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    pub fn stats(mut self, stats: StatsCollector) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Result<SimulatedWorld> {
        let config = self.config.ok_or(Error::MissingParameter("config"))?;
        config.validate()?;

        Ok(SimulatedWorld {
            config,
            dataset: self.dataset.ok_or(Error::MissingParameter("dataset"))?,
            policy: self.policy.ok_or(Error::MissingParameter("policy"))?,
            coordinator: self.coordinator.unwrap_or_else(|| Box::new(LocalWorkflowCoordinator::new())),
            stats: self.stats.map(Rc::new),
        })
    }
}

impl SimulatedWorld {
    pub fn builder() -> SimulatedWorldBuilder {
        SimulatedWorldBuilder::default()
    }

    /// Creates the cluster, runs the tick engine to the end and returns the report.
    pub fn run(self) -> Result<SolutionDto> {
        let SimulatedWorld { config, dataset, policy, coordinator, stats } = self;
        let total_tasks = dataset.task_count();
        let workflow_count = dataset.workflows.len();

        let mut ctx = SimulationContext::new();
        HostFactory::new().create_hosts(&dataset.hosts, &mut ctx.hosts)?;
        VmFactory::new().create_vms(&dataset.vms, &mut ctx.hosts, &mut ctx.vms)?;

        let buffer = Rc::new(RefCell::new(WorkflowBuffer::new(policy.clone(), coordinator)));
        let submitter = WorkflowSubmitter::new(dataset.workflows, buffer.clone());

        let mut engine = TickEngine::new(config.tick_interval)?;
        engine.register(Box::new(submitter));
        engine.register(Box::new(buffer));
        engine.register(Box::new(SchedulingListener::new(policy.clone())));
        engine.register(Box::new(HostMonitor::new(config.monitoring_interval, stats.clone())?));

        log::info!(
            "Starting simulation: {} workflows, {} tasks, {} VMs, policy {}, duration {}.",
            workflow_count,
            total_tasks,
            ctx.vms.len(),
            policy.borrow().name(),
            config.duration
        );

        let end_time = engine.run(&mut ctx, config.duration)?;
        drop(engine);

        let solution = Self::report(&ctx, total_tasks, end_time)?;
        let summary = &solution.summary;
        tracing::info!(
            target: ANALYTICS_TARGET,
            Time = end_time,
            LogDescription = "Run summary",
            CompletedTasks = summary.completed_tasks,
            TotalTasks = summary.total_tasks,
            TotalMakespan = summary.total_makespan,
            AverageUtilization = summary.average_host_utilization,
            EnergyJoule = summary.total_energy_joule,
            Truncated = summary.truncated,
        );

        if let Some(stats) = stats {
            match Rc::try_unwrap(stats) {
                Ok(stats) => stats.shutdown(),
                Err(_) => log::warn!("Statistics collector still shared at the end of the run."),
            }
        }

        Ok(solution)
    }

    fn report(ctx: &SimulationContext, total_tasks: usize, end_time: f64) -> Result<SolutionDto> {
        Ok(SolutionDto {
            vm_assignments: ctx.cloudlets.vm_assignments()?,
            summary: SummaryDto {
                total_tasks,
                completed_tasks: ctx.cloudlets.completed_cloudlet_count(),
                total_makespan: ctx.cloudlets.total_makespan(),
                last_finish_time: ctx.cloudlets.last_cloudlet_finished_at(),
                average_host_utilization: ctx.hosts.average_utilization(),
                total_energy_joule: ctx.hosts.total_energy_consumption(end_time),
                end_time,
                truncated: ctx.is_truncated(),
            },
        })
    }
}
