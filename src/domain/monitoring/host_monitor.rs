use std::rc::Rc;

use crate::domain::resource::host::UtilizationSample;
use crate::domain::simulator::context::SimulationContext;
use crate::domain::simulator::tick_listener::TickListener;
use crate::domain::utils::statistics::{ANALYTICS_TARGET, StatParameter, StatisticEvent, StatsCollector};
use crate::error::{Error, Result};

/// Samples host utilization every `interval` units of simulated time.
pub struct HostMonitor {
    interval: f64,
    next_update: f64,
    samples_taken: usize,
    stats: Option<Rc<StatsCollector>>,
}

impl HostMonitor {
    pub fn new(interval: f64, stats: Option<Rc<StatsCollector>>) -> Result<Self> {
        if !(interval > 0.0 && interval.is_finite()) {
            return Err(Error::InvalidConfig(format!("monitoring interval must be positive, got {}", interval)));
        }
        Ok(Self { interval, next_update: 0.0, samples_taken: 0, stats })
    }

    pub fn samples_taken(&self) -> usize {
        self.samples_taken
    }

    fn record(&self, time: f64, ctx: &SimulationContext, samples: &[UtilizationSample]) {
        for sample in samples {
            tracing::info!(
                target: ANALYTICS_TARGET,
                Time = time,
                LogDescription = "Host sample",
                HostId = sample.host_id.value(),
                CpuUtilization = sample.cpu_utilization,
                PowerWatt = sample.power_watt,
            );

            if let Some(stats) = &self.stats {
                let mut event = StatisticEvent::new();
                event
                    .set(StatParameter::Time, time)
                    .set(StatParameter::LogDescription, "Host sample")
                    .set(StatParameter::HostId, sample.host_id.value())
                    .set(StatParameter::CpuUtilization, sample.cpu_utilization)
                    .set(StatParameter::PowerWatt, sample.power_watt);
                stats.add_event(event);
            }
        }

        if let Some(stats) = &self.stats {
            let mut event = StatisticEvent::new();
            event
                .set(StatParameter::Time, time)
                .set(StatParameter::LogDescription, "System sample")
                .set(StatParameter::RunningCloudlets, ctx.cloudlets.running_cloudlet_count())
                .set(StatParameter::BufferedTasks, ctx.task_states.buffered_tasks())
                .set(StatParameter::ReleasedTasks, ctx.task_states.released_tasks())
                .set(StatParameter::CompletedTasks, ctx.cloudlets.completed_cloudlet_count());
            stats.add_event(event);
        }
    }
}

impl TickListener for HostMonitor {
    fn name(&self) -> &'static str {
        "host-monitor"
    }

    fn on_tick(&mut self, time: f64, ctx: &mut SimulationContext) -> Result<()> {
        if self.next_update > time {
            return Ok(());
        }
        while self.next_update <= time {
            self.next_update += self.interval;
        }

        let samples = ctx.hosts.update_utilization_of_hosts(time, &ctx.vms, &ctx.cloudlets);
        self.samples_taken += 1;
        self.record(time, ctx, &samples);
        Ok(())
    }
}
