use std::path::PathBuf;
use std::time::Duration;

use crate::domain::scheduler::algorithm_type::PolicyType;
use crate::domain::scheduler::release_mode::ReleaseMode;
use crate::error::{Error, Result};

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedWorldConfig {
    /// Simulated time at which the run stops.
    pub duration: f64,
    pub tick_interval: f64,
    pub monitoring_interval: f64,
    pub policy: PolicyType,
    pub release_mode: ReleaseMode,
    /// Seed of the random algorithm.
    pub seed: u64,
    /// CSV file receiving the utilization samples.
    pub stats_file: Option<PathBuf>,
}

impl Default for SimulatedWorldConfig {
    fn default() -> Self {
        Self {
            duration: 1000.0,
            tick_interval: 1.0,
            monitoring_interval: 5.0,
            policy: PolicyType::default(),
            release_mode: ReleaseMode::default(),
            seed: 0,
            stats_file: None,
        }
    }
}

impl SimulatedWorldConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{} must be positive, got {}", name, value)))
            }
        };

        positive("duration", self.duration)?;
        positive("tick interval", self.tick_interval)?;
        positive("monitoring interval", self.monitoring_interval)
    }
}

/// Where the decision bridge listens for the external agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for waiting on the bridge thread at the end of the run.
    pub join_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 25333, join_timeout: Duration::from_secs(5) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulatedWorldConfig::default().validate().unwrap();
    }

    #[test]
    fn negative_duration_is_rejected() {
        let config = SimulatedWorldConfig { duration: -1.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
